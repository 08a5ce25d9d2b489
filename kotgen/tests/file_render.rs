//! Snapshot tests for whole-file emission.
//!
//! These verify the two-pass rendering end to end: import collection,
//! alias generation, short-name resolution, and formatting. Run
//! `cargo insta review` to update snapshots after intentional changes.

use kotgen::{
    AnnotationSpec, Arg, ClassName, CodeBlock, LambdaTypeName, MemberName, ParameterSpec,
    SourceFile, TypeName, builtins,
};

#[test]
fn taco_factory() {
    let taco = ClassName::new("com.squareup.tacos", ["Taco"]);
    let tacos = builtins::list().parameterized_by([taco.clone().into()]);
    let file = SourceFile::builder("com.example.produce", "TacoFactory")
        .add_file_comment("Generated by kotgen, do not edit!", [])
        .add_code(
            CodeBlock::builder()
                .begin_control_flow(
                    "fun produce(count: %T): %T",
                    [Arg::ty(builtins::int()), Arg::ty(tacos)],
                )
                .add_statement("val result = mutableListOf<%T>()", [Arg::ty(taco.clone())])
                .begin_control_flow("repeat(count)", [])
                .add_statement("result += %T()", [Arg::ty(taco)])
                .end_control_flow()
                .add_statement("return result", [])
                .end_control_flow()
                .build(),
        )
        .build();
    insta::assert_snapshot!(file.to_string(), @r###"
    // Generated by kotgen, do not edit!
    package com.example.produce

    import com.squareup.tacos.Taco
    import kotlin.Int
    import kotlin.collections.List

    fun produce(count: Int): List<Taco> {
      val result = mutableListOf<Taco>()
      repeat(count) {
        result += Taco()
      }
      return result
    }
    "###);
}

#[test]
fn string_templates_and_member_imports() {
    let file = SourceFile::builder("com.example", "Greeter")
        .add_code(
            CodeBlock::builder()
                .add_statement("val greeting = %S", [Arg::string("Hello, $user")])
                .add_statement(
                    "val template = %P",
                    [Arg::string("Hello, $user")],
                )
                .add_statement(
                    "val total = %M(-42)",
                    [Arg::member(MemberName::new("kotlin.math", "abs"))],
                )
                .build(),
        )
        .build();
    insta::assert_snapshot!(file.to_string(), @r###"
    package com.example

    import kotlin.math.abs

    val greeting = "Hello, ${'$'}user"
    val template = """Hello, $user"""
    val total = abs(-42)
    "###);
}

#[test]
fn nullable_suspending_lambda_property() {
    let taco = ClassName::new("com.squareup.tacos", ["Taco"]);
    let callback = LambdaTypeName::new(
        vec![ParameterSpec::unnamed(taco)],
        builtins::unit().into(),
    )
    .with_suspending(true)
    .with_nullable(true);
    let file = SourceFile::builder("com.example", "Callbacks")
        .add_code(CodeBlock::of("var callback: %T = null\n", [Arg::ty(callback)]))
        .build();
    insta::assert_snapshot!(file.to_string(), @r###"
    package com.example

    import com.squareup.tacos.Taco
    import kotlin.Unit

    var callback: (suspend (Taco) -> Unit)? = null
    "###);
}

#[test]
fn annotated_nullable_type_argument() {
    let tagged = TypeName::from(builtins::string())
        .with_annotations(vec![AnnotationSpec::new(ClassName::new(
            "com.example.anno",
            ["Tagged"],
        ))])
        .with_nullable(true);
    let list = builtins::list().parameterized_by([tagged]);
    let file = SourceFile::builder("com.example", "Xs")
        .add_code(CodeBlock::of("val xs: %T = listOf()\n", [Arg::ty(list)]))
        .build();
    insta::assert_snapshot!(file.to_string(), @r###"
    package com.example

    import com.example.anno.Tagged
    import kotlin.String
    import kotlin.collections.List

    val xs: List<@Tagged String?> = listOf()
    "###);
}

#[test]
fn collecting_pass_and_final_pass_agree_on_structure() {
    // The same file rendered twice is identical: no state leaks between
    // the collecting pass and the emit pass of a single write_to call.
    let file = SourceFile::builder("com.example", "Stable")
        .add_code(CodeBlock::of(
            "val x: %T = setOf()\n",
            [Arg::ty(builtins::set().parameterized_by([builtins::long().into()]))],
        ))
        .build();
    assert_eq!(file.to_string(), file.to_string());
}

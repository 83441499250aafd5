//! Accept/reject tests for the full lexer + parser pipeline.

use crate::{error::ErrorCode, lexer, parser};

/// Parse a source string and return success/failure
fn parse_source(source: &str) -> Result<(), String> {
    let tokens = lexer::tokenize(source).map_err(|err| format!("Lexer error: {}", err))?;
    let _file = parser::build_file(&tokens).map_err(|err| format!("Parser error: {}", err))?;
    Ok(())
}

fn assert_parses_successfully(source: &str) {
    if let Err(e) = parse_source(source) {
        panic!("Expected parsing to succeed, but got error: {}", e);
    }
}

fn assert_parse_fails(source: &str) {
    if parse_source(source).is_ok() {
        panic!("Expected parsing to fail, but it succeeded: {source:?}");
    }
}

fn parse_error_code(source: &str) -> Option<ErrorCode> {
    match lexer::tokenize(source) {
        Err(err) => err.diagnostics()[0].code(),
        Ok(tokens) => parser::build_file(&tokens).err().and_then(|d| d.code()),
    }
}

#[test]
fn test_header_only_sections() {
    assert_parses_successfully("[gd_scene load_steps=8 format=3 uid=\"uid://dqjk33fq44wxh\"]");
    assert_parses_successfully("[gd_resource type=\"Theme\" format=3]\n");
    assert_parses_successfully("[connection signal=\"pressed\" from=\"Button\" to=\".\" method=\"_on_pressed\"]");
}

#[test]
fn test_body_values() {
    assert_parses_successfully(
        r#"[sub_resource type="Environment" id="Environment_3prqi"]
background_mode = 2
sky = SubResource("Sky_3uant")
sky_rotation = Vector3(0, 0, 6.28319)
sdfgi_use_occlusion = true
glow_bloom = 0.2
"#,
    );
}

#[test]
fn test_multiline_values() {
    assert_parses_successfully(
        r#"[sub_resource type="Animation" id="Animation_idle"]
tracks/0/keys = {
"times": PackedFloat32Array(0, 1),
"values": [Vector2(0, 0), Vector2(0, -4)],
"update": 0
}
"#,
    );
}

#[test]
fn test_special_literals() {
    assert_parses_successfully(
        "[node name=\"A\" type=\"Node\"]\nlimit = inf\nfloor = -inf\nodd = nan\ntarget = null\nanim = &\"idle\"\npath = NodePath(\"B\")\nnp = ^\"B/C\"\n",
    );
}

#[test]
fn test_comments_everywhere() {
    assert_parses_successfully("; header comment\n[node name=\"A\" type=\"Node\"] ; trailing\n; body comment\nvisible = false\n");
}

#[test]
fn test_godot3_numeric_ids() {
    assert_parses_successfully(
        "[ext_resource path=\"res://Player.tscn\" type=\"PackedScene\" id=1]\n\n[node name=\"Player\" parent=\".\" instance=ExtResource( 1 )]\n",
    );
}

#[test]
fn test_typed_collections() {
    assert_parses_successfully(
        r#"[node name="Spawner" type="Node3D"]
spawn_points = Array[NodePath]([NodePath("A"), NodePath("B")])
counts = Array[int]([1, 2])
items = Array[ExtResource("1_item")]([])
weights = Dictionary[String, int]({
"a": 1
})
"#,
    );
}

#[test]
fn test_object_values() {
    assert_parses_successfully(
        r#"[sub_resource type="Shortcut" id="Shortcut_quit"]
events = [Object(InputEventKey,"resource_local_to_scene":false,"resource_name":"","device":-1,"keycode":4194305,"script":null)
]
"#,
    );
    assert_parses_successfully("[node name=\"A\" type=\"Node\"]\nempty = Object(Node)\n");
}

#[test]
fn test_reject_unclosed_type_arguments() {
    assert_parse_fails("[node name=\"A\"]\nitems = Array[int([1])\n");
}

#[test]
fn test_reject_object_without_class() {
    assert_parse_fails("[node name=\"A\"]\nevent = Object(\"keycode\":1)\n");
}

#[test]
fn test_reject_unterminated_header() {
    assert_parse_fails("[node name=\"A\"");
    assert_eq!(parse_error_code("[node name=\"A\""), Some(ErrorCode::E101));
}

#[test]
fn test_reject_missing_value() {
    assert_parse_fails("[node name=]");
    assert_eq!(parse_error_code("[node name=]"), Some(ErrorCode::E100));
}

#[test]
fn test_reject_unterminated_string() {
    assert_eq!(parse_error_code("[node name=\"A]\n"), Some(ErrorCode::E001));
}

#[test]
fn test_reject_unexpected_character() {
    assert_eq!(parse_error_code("[node name=\"A\" $]"), Some(ErrorCode::E002));
}

#[test]
fn test_reject_stray_closing_bracket() {
    assert_parse_fails("[node name=\"A\"]\n]");
}

#[test]
fn test_reject_unclosed_call() {
    assert_parse_fails("[node name=\"A\"]\nscript = ExtResource(\"1\"\n[node name=\"B\"]");
}

#[test]
fn test_reject_body_line_without_value() {
    assert_parse_fails("[node name=\"A\"]\nvisible\n");
}

mod properties {
    use proptest::prelude::*;

    use crate::parse_scene;

    fn scene_fragment() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just("[".to_string()),
                Just("]".to_string()),
                Just("node".to_string()),
                Just("name=".to_string()),
                Just("parent=\".\"".to_string()),
                Just("type=\"Node\"".to_string()),
                Just("ExtResource(\"1\")".to_string()),
                Just("\n".to_string()),
                Just(" ".to_string()),
                Just("\"".to_string()),
                "[a-z]{1,5}",
            ],
            0..40,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn test_parse_scene_never_panics(source in scene_fragment()) {
            let _ = parse_scene(&source);
        }

        #[test]
        fn test_parse_scene_never_panics_on_any_text(source in "\\PC{0,200}") {
            let _ = parse_scene(&source);
        }
    }
}

use stmtgen::{generate, generate_with, Error, ErrorKind, Options, Pipeline, PlaceholderMode, ReturnShape};

const GET_USERS: &str =
    "-- title: GetUsers\nselect * from users where id = @userID:string@ and age > @userAge:int@;";

fn keyed() -> Options {
    Options {
        placeholder: PlaceholderMode::Named,
        return_shape: ReturnShape::Keyed,
        ..Options::default()
    }
}

#[test]
fn test_get_users_sequential_ordered() {
    let module = generate("user_actions", GET_USERS).unwrap();

    assert_eq!(module.name, "user_actions");
    assert_eq!(module.file_name(), "user_actions_actions_gen.go");
    assert!(module
        .code
        .contains("const getUsers = \"select * from users where id = $1 and age > $2;\""));
    assert!(module.code.contains("func GetUsers(\n\tuserID string, userAge int,\n) (string, []any) {"));
    assert!(module.code.contains("[]any{\n\t\tuserID, userAge,\n\t}"));
}

#[test]
fn test_get_users_named_keyed() {
    let module = generate_with("user_actions", GET_USERS, keyed()).unwrap();

    assert!(module
        .code
        .contains("const getUsers = \"select * from users where id = @userID and age > @userAge;\""));
    assert!(module.code.contains(") (string, map[string]any) {"));
    assert!(module
        .code
        .contains("map[string]any{\n\t\t\"userID\": userID, \"userAge\": userAge,\n\t}"));
}

#[test]
fn test_every_title_yields_one_accessor() {
    let source = "-- title: A\nselect 1;\n-- title: B\nselect 2;\n-- title: C\nselect 3;\n-- title: B\nselect 4;\n";
    let module = generate("t", source).unwrap();

    let names: Vec<_> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(module.functions[1].statement, "select 4;");
    assert_eq!(module.code.matches("\nfunc B(").count(), 1);
}

#[test]
fn test_sequential_numbers_every_occurrence() {
    let source = "-- title: Q\nselect @a:int@, @b:int@, @a:int@, @c:int@, @b:int@;\n";
    let module = generate("q", source).unwrap();
    let f = &module.functions[0];

    assert_eq!(f.parameters, vec!["a int", "b int", "c int"]);
    assert_eq!(f.statement, "select $1, $2, $3, $4, $5;");
}

#[test]
fn test_sequential_distinct_names_have_no_gaps_or_repeats() {
    let source = "-- title: Q\nselect @a:int@, @b:int@, @c:int@;\n";
    let module = generate("q", source).unwrap();
    let f = &module.functions[0];

    assert_eq!(f.parameters.len(), 3);
    for n in 1..=3 {
        assert_eq!(f.statement.matches(&format!("${}", n)).count(), 1);
    }
    assert!(!f.statement.contains("$4"));
}

#[test]
fn test_titles_sharing_a_constant_emit_it_once() {
    let source = "-- title: GetUsers\nselect 1;\n-- title: getUsers\nselect 2;\n";
    let module = generate("t", source).unwrap();

    assert_eq!(module.functions.len(), 1);
    assert_eq!(module.code.matches("const getUsers =").count(), 1);
    assert!(module.code.contains("const getUsers = \"select 2;\""));
}

#[test]
fn test_incompatible_combinations_rejected() {
    for (placeholder, return_shape) in [
        (PlaceholderMode::Positional, ReturnShape::Keyed),
        (PlaceholderMode::Sequential, ReturnShape::Keyed),
        (PlaceholderMode::Named, ReturnShape::Ordered),
    ] {
        let options = Options { placeholder, return_shape, ..Options::default() };
        let err = generate_with("q", GET_USERS, options).unwrap_err();
        assert!(matches!(err, Error::Incompatible { .. }), "{placeholder}/{return_shape}");
    }
}

#[test]
fn test_blank_file_yields_empty_module() {
    let module = generate("blank", "\n\n").unwrap();
    assert!(module.functions.is_empty());
    assert!(!module.code.contains("func "));
    assert!(module.code.starts_with("// Code generated by stmtgen. DO NOT EDIT.\npackage actionsgen\n"));
}

#[test]
fn test_untitled_content_is_kept() {
    let module = generate("untitled", "select 1;\n").unwrap();
    assert_eq!(module.functions.len(), 1);
    assert_eq!(module.functions[0].name, "");
    assert_eq!(module.functions[0].statement, "select 1;");
}

#[test]
fn test_custom_package_and_imports() {
    let options = Options { package: "queries".to_string(), ..Options::default() };
    let source = "-- addimport: \"time\"\n-- addimport: \"github.com/google/uuid\"\n-- title: Since\nselect * from e where at > @at:time.Time@ and id = @id:uuid.UUID@;\n";
    let module = generate_with("events", source, options).unwrap();

    assert_eq!(module.package, "queries");
    assert_eq!(module.imports, vec!["\"time\"", "\"github.com/google/uuid\""]);
    assert!(module.code.contains("package queries\n"));
    assert!(module
        .code
        .contains("import (\n\t\"time\"\n\t\"github.com/google/uuid\"\n)\n"));
    assert!(module.code.contains("\tat time.Time, id uuid.UUID,\n"));
}

#[test]
fn test_type_conflict_is_not_fatal() {
    let module = generate("q", "-- title: Q\nselect @id:int@ where x = @id:string@;\n").unwrap();
    assert_eq!(module.functions[0].parameters, vec!["id int"]);
}

#[test]
fn test_fatal_errors_carry_kind() {
    let cases = [
        ("-- title: A title: B\nselect 1;\n", ErrorKind::MalformedTitle),
        ("-- addimport: a addimport: b\n", ErrorKind::MalformedImport),
        ("-- title: A\nselect @x:int:int@;\n", ErrorKind::MalformedAnnotation),
        ("-- title: A\nselect @:int@;\n", ErrorKind::MalformedAnnotation),
    ];
    for (source, kind) in cases {
        match generate("q", source) {
            Err(Error::Parse(e)) => assert_eq!(e.kind, kind, "{source}"),
            other => panic!("expected parse error for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_pipeline_reports_configuration() {
    let pipeline = Pipeline::new(keyed()).unwrap();
    assert_eq!(pipeline.placeholder(), PlaceholderMode::Named);
    assert_eq!(pipeline.return_shape(), ReturnShape::Keyed);
    assert_eq!(pipeline.package(), "actionsgen");
}

#[test]
fn test_json_serialization() {
    let module = generate_with("user_actions", GET_USERS, keyed()).unwrap();
    let json = serde_json::to_value(&module).unwrap();

    assert_eq!(json["name"], "user_actions");
    assert_eq!(json["functions"][0]["name"], "GetUsers");
    assert_eq!(json["functions"][0]["constant"], "getUsers");
    assert_eq!(json["functions"][0]["parameters"][1], "userAge int");
}

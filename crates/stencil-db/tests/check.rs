use salsa::Setter as _;
use stencil_db::{File, FileParse as _, RootDatabase, Reported, check_file};

#[derive(Debug, PartialEq, Eq)]
struct ExpectedDiag {
    line: usize,
    message: String,
}

#[derive(Debug, PartialEq, Eq)]
struct ActualDiag {
    line: usize,
    message: String,
}

/// Expectations are comments of the form `@*~ message *@`.
fn parse_expectations(fixture: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((_, comment)) = line.split_once("@*~") else {
            continue;
        };
        let comment = comment.split_once("*@").map_or(comment, |(body, _)| body).trim();
        if comment.is_empty() {
            continue;
        }
        expected.push(ExpectedDiag { line: idx + 1, message: comment.to_owned() });
    }

    expected
}

fn collect_actual(db: &RootDatabase, file: File) -> Vec<ActualDiag> {
    let line_index = file.line_index(db);
    let mut actual = check_file::accumulated::<Reported>(db, file)
        .into_iter()
        .map(|reported| {
            let line = line_index.line_col(reported.0.range().start()).line as usize + 1;
            ActualDiag { line, message: reported.0.message().to_owned() }
        })
        .collect::<Vec<_>>();
    actual.sort_by_key(|diag| (diag.line, diag.message.clone()));
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let db = RootDatabase::default();
    let file = File::new(&db, "check.stencil".into(), fixture.to_owned());

    let mut actual = collect_actual(&db, file);
    let mut expected = parse_expectations(fixture);
    expected.sort_by_key(|diag| (diag.line, diag.message.clone()));

    assert_eq!(
        expected.len(),
        actual.len(),
        "expected {} diagnostic(s), got {}\nexpected: {expected:#?}\nactual: {actual:#?}",
        expected.len(),
        actual.len(),
    );

    for expected_diag in expected {
        let Some(pos) = actual.iter().position(|diag| {
            diag.line == expected_diag.line && diag.message.contains(&expected_diag.message)
        }) else {
            panic!(
                "missing diagnostic on line {} containing `{}`\nactual: {actual:#?}",
                expected_diag.line, expected_diag.message
            );
        };
        actual.remove(pos);
    }

    assert!(actual.is_empty(), "unexpected diagnostics:\n{actual:#?}");
}

#[test]
fn clean_file() {
    check(
        r#"
<ul class="users">
    <li title="@user.Title">@user.Name</li>
    <br>
</ul>
"#,
    );
}

#[test]
fn stray_end_tag() {
    check(
        r#"
<ul>
    <li>one</li>
    </span> @*~ end tag has no matching start tag *@
</ul>
"#,
    );
}

#[test]
fn missing_identifier_after_transition() {
    check(
        r#"
<p>
    @ @*~ expected identifier *@
</p>
"#,
    );
}

#[test]
fn edits_are_picked_up() {
    let mut db = RootDatabase::default();
    let file = File::new(&db, "edit.stencil".into(), "<p>a</p>".to_owned());
    assert!(check_file::accumulated::<Reported>(&db, file).is_empty());

    file.set_text(&mut db).to("<p>a".to_owned());
    let tree = file.parse_tree(&db);
    assert_eq!(tree.full_text(), "<p>a");

    let diagnostics = check_file::accumulated::<Reported>(&db, file);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].0.message(), "missing end tag for `<p>`");
}

#[test]
fn equal_trees_compare_equal() {
    let db = RootDatabase::default();
    let first = File::new(&db, "a.stencil".into(), "<b>x</b>".to_owned());
    let second = File::new(&db, "b.stencil".into(), "<b>x</b>".to_owned());
    assert_eq!(first.parse(&db), second.parse(&db));
}

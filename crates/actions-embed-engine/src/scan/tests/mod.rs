//! Behaviour tests for a full scan.
//!
//! Documents are built inline so the line numbers under test are visible
//! next to the assertions. Fixture files with snapshots live under the
//! crate's `tests/` directory.

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{
    BlockClaim, RegionRole, ScanReport,
    kinds::{BlockScalarHeader, Chomping, IndentDigits, ScalarStyle},
    scan_document,
};
use crate::{
    document::{Document, LineRange},
    grammar::{EmbedRule, Grammar},
    snapshot,
};

fn scan(text: &str, grammar: &Grammar) -> ScanReport {
    let doc = Document::new(text);
    let report = scan_document(&doc, grammar);
    snapshot::invariants(&doc, &report);
    report
}

/// `(header, first body, last body, language)` per block.
fn spans(report: &ScanReport) -> Vec<(usize, Option<usize>, Option<usize>, &str)> {
    report
        .blocks
        .iter()
        .map(|b| {
            (
                b.header_line,
                b.first_body_line(),
                b.last_body_line(),
                b.language(),
            )
        })
        .collect()
}

fn step_lines(report: &ScanReport) -> Vec<usize> {
    report.steps.iter().map(|s| s.line).collect()
}

const TWO_SCRIPT_STEPS: &str = "\
steps:
  - uses: actions/github-script@v7
    with:
      script: |
        const a = 1;

        console.log(a);
        core.info('a');
  - uses: actions/github-script@v6
    with:
      script: |
        const b = 2;

        console.log(b);
  - run: echo done
";

// Github script

#[test]
fn two_sequential_steps_each_get_one_block() {
    let report = scan(TWO_SCRIPT_STEPS, &Grammar::github_script());

    assert_eq!(step_lines(&report), vec![2, 9]);
    assert_eq!(
        spans(&report),
        vec![
            (4, Some(5), Some(8), "javascript"),
            (11, Some(12), Some(14), "javascript"),
        ]
    );
}

#[test]
fn nested_variant_reports_the_with_key() {
    let report = scan(TWO_SCRIPT_STEPS, &Grammar::github_script_params());

    assert_eq!(step_lines(&report), vec![2, 9]);
    let nested: Vec<_> = report.nested_keys.iter().map(|n| n.line).collect();
    assert_eq!(nested, vec![3, 10]);
    assert!(report.nested_keys.iter().all(|n| n.key == "with"));
    assert_eq!(
        spans(&report),
        vec![
            (4, Some(5), Some(8), "javascript"),
            (11, Some(12), Some(14), "javascript"),
        ]
    );
}

#[test]
fn nested_variant_ignores_script_outside_with() {
    let text = "\
- uses: actions/github-script@v7
  script: |
    not nested
  with:
    script: |
      nested";
    let report = scan(text, &Grammar::github_script_params());
    assert_eq!(spans(&report), vec![(5, Some(6), Some(6), "javascript")]);

    let flat = scan(text, &Grammar::github_script());
    assert_eq!(
        spans(&flat),
        vec![
            (2, Some(3), Some(3), "javascript"),
            (5, Some(6), Some(6), "javascript"),
        ]
    );
}

#[rstest]
#[case("actions/github-script")]
#[case("actions/github-script@v7")]
#[case("'actions/github-script@v7'")]
#[case("\"actions/github-script@v7\"")]
#[case("actions/github-script@releases/v7")]
#[case("\"actions/github-script@refs/heads/main\"")]
#[case("actions/github-script@v7 # pinned")]
fn action_reference_forms_qualify(#[case] uses: &str) {
    let text = format!("- uses: {uses}\n  with:\n    script: |\n      run();");
    let report = scan(&text, &Grammar::github_script_params());

    assert_eq!(step_lines(&report), vec![1]);
    assert_eq!(report.steps[0].action.identifier, "actions/github-script");
    assert_eq!(spans(&report), vec![(3, Some(4), Some(4), "javascript")]);
}

#[rstest]
#[case("actions/checkout@v4")]
#[case("actions/github-script-extra@v1")]
#[case("my-org/actions/github-script@v7")]
#[case("actions/github-script@")]
#[case("'actions/github-script@v7")]
#[case("actions/github-script@v7 extra")]
fn non_qualifying_step_produces_no_facts(#[case] uses: &str) {
    let text = format!("- uses: {uses}\n  with:\n    script: |\n      run();\n");
    for grammar in [Grammar::github_script(), Grammar::github_script_params()] {
        let report = scan(&text, &grammar);
        assert!(report.is_empty(), "{uses}: {report:?}");
    }
}

#[test]
fn uses_after_the_opening_line_does_not_qualify() {
    let text = "\
- name: x
  uses: actions/github-script@v7
  with:
    script: |
      a();";
    for grammar in [Grammar::github_script(), Grammar::github_script_params()] {
        let report = scan(text, &grammar);
        assert!(report.is_empty(), "{}: {report:?}", grammar.name);
    }
}

#[test]
fn uses_nested_deeper_than_the_step_does_not_qualify() {
    let text = "\
- name: wrapper
  with:
    uses: actions/github-script@v7
    script: |
      nope();
";
    assert!(scan(text, &Grammar::github_script()).is_empty());
}

// Block boundaries

#[test]
fn body_includes_deeper_lines_and_stops_at_same_indent() {
    let text = "\
- uses: actions/github-script@v7
  script: |
    one();

      nested();
    two();
  result-encoding: string
";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(6), "javascript")]);
}

#[test]
fn less_indented_body_line_ends_the_block() {
    let text = "\
- uses: actions/github-script@v7
  with:
      script: |
        inside();
     outside();
";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(spans(&report), vec![(3, Some(4), Some(4), "javascript")]);
}

#[test]
fn unterminated_block_extends_to_end_of_document() {
    let text = "- uses: actions/github-script@v7\n  script: |\n    a();\n    b();";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(4), "javascript")]);
}

#[test]
fn trailing_blank_lines_at_end_of_document_belong_to_the_body() {
    let text = "- uses: actions/github-script@v7\n  script: |\n    a();\n\n";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(5), "javascript")]);
}

#[test]
fn header_on_list_line_ends_at_sibling_keys() {
    let mut grammar = Grammar::github_script();
    grammar.action = None;
    let text = "- script: |\n    a();\n  other: 1\n  more: 2";
    let report = scan(text, &grammar);
    assert_eq!(spans(&report), vec![(1, Some(2), Some(2), "javascript")]);
}

#[test]
fn claimed_run_on_list_line_leaves_later_siblings_alone() {
    let text = "\
- run: |
    echo one
  shell: bash
  run: |
    echo two
- shell: python
  run: |
    print(3)";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(
        spans(&report),
        vec![
            (4, Some(5), Some(5), "shellscript"),
            (7, Some(8), Some(8), "python"),
        ]
    );
}

#[test]
fn header_without_body_has_no_span() {
    let text = "\
- uses: actions/github-script@v7
  script: |
  result-encoding: string
";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(spans(&report), vec![(2, None, None, "javascript")]);
}

#[test]
fn opening_line_does_not_close_its_own_step() {
    // `- uses:` is not indented deeper than its own indentation.
    let text = "- uses: actions/github-script@v7\n  script: >-\n    x();";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(step_lines(&report), vec![1]);
    assert_eq!(spans(&report), vec![(2, Some(3), Some(3), "javascript")]);
}

#[test]
fn crlf_line_endings_are_treated_like_lf() {
    let text = "- uses: actions/github-script@v7\r\n  script: |\r\n    a();\r\n  other: 1\r\n";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(3), "javascript")]);
}

#[test]
fn body_is_not_inspected_for_headers() {
    let text = "\
- uses: actions/github-script@v7
  script: |
    const text = `
    - uses: actions/github-script@v7
      script: |
        inner
    `;";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(step_lines(&report), vec![1]);
    assert_eq!(spans(&report), vec![(2, Some(3), Some(7), "javascript")]);
}

#[rstest]
#[case("|+-")]
#[case("|0")]
#[case("|22")]
#[case(">-+")]
#[case("| # comment")]
#[case("|x")]
#[case("'|'")]
fn invalid_script_indicator_opens_no_block(#[case] indicator: &str) {
    let text = format!("- uses: actions/github-script@v7\n  script: {indicator}\n    a();\n");
    let report = scan(&text, &Grammar::github_script());
    assert_eq!(step_lines(&report), vec![1]);
    assert!(report.blocks.is_empty(), "{indicator}: {report:?}");
}

#[test]
fn header_indicator_is_recorded() {
    let text = "- uses: actions/github-script@v7\n  script: >+2\n    a();\n";
    let report = scan(text, &Grammar::github_script());
    assert_eq!(
        report.blocks[0].header,
        BlockScalarHeader {
            style: ScalarStyle::Folded,
            chomping: Chomping::Keep,
            indent: Some(2),
        }
    );
}

// Run shell

#[test]
fn five_recognized_shells_and_one_unknown() {
    let text = "\
steps:
  - shell: bash
    run: |
      echo hi
  - shell: pwsh
    run: |
      Write-Host hi
  - shell: cmd
    run: |
      echo hi
  - shell: python
    run: |
      print('hi')
  - shell: node
    run: |
      console.log('hi');
  - shell: fish
    run: |
      echo hi
";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(
        spans(&report),
        vec![
            (3, Some(4), Some(4), "shellscript"),
            (6, Some(7), Some(7), "powershell"),
            (9, Some(10), Some(10), "bat"),
            (12, Some(13), Some(13), "python"),
            (15, Some(16), Some(16), "javascript"),
        ]
    );
    assert!(report.steps.is_empty());
}

#[test]
fn declaration_after_run_does_not_embed() {
    let after = "- run: |\n    echo hi\n  shell: bash\n";
    assert!(scan(after, &Grammar::run_shell()).is_empty());

    let before = "- shell: bash\n  run: |\n    echo hi";
    assert_eq!(
        spans(&scan(before, &Grammar::run_shell())),
        vec![(2, Some(3), Some(3), "shellscript")]
    );
}

#[test]
fn declaration_between_two_runs_claims_only_the_second() {
    let text = "\
- run: |
    echo one
  shell: python
  run: |
    print('two')";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(spans(&report), vec![(4, Some(5), Some(5), "python")]);
}

#[test]
fn last_declaration_wins() {
    let text = "- shell: bash\n  shell: python\n  run: |\n    print(1)";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(spans(&report), vec![(3, Some(4), Some(4), "python")]);
    assert_eq!(
        report.blocks[0].embedding.claim,
        BlockClaim::Declaration {
            resolver: "shell-python".to_string(),
            shell: "python".to_string(),
            line: 2,
        }
    );
}

#[test]
fn declaration_does_not_leak_into_next_step() {
    let text = "\
- shell: bash
  run: |
    echo one
- run: |
    echo two
";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(3), "shellscript")]);
}

#[rstest]
#[case("shell: 'pwsh'")]
#[case("shell: \"pwsh\"")]
#[case("shell: pwsh # comment")]
#[case("shell: \"pwsh\" # explicit shell")]
fn quoted_and_commented_declarations_resolve(#[case] declaration: &str) {
    let text = format!("- {declaration}\n  run: |\n    Get-Date");
    let report = scan(&text, &Grammar::run_shell());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(3), "powershell")]);
}

#[rstest]
#[case("|")]
#[case("|-")]
#[case(">+")]
#[case("|2")]
#[case("|-2")]
#[case(">+9")]
#[case(">9+")]
fn run_accepts_valid_indicators(#[case] indicator: &str) {
    let text = format!("- shell: bash\n  run: {indicator}\n    echo hi");
    let report = scan(&text, &Grammar::run_shell());
    assert_eq!(spans(&report), vec![(2, Some(3), Some(3), "shellscript")]);
}

#[rstest]
#[case("|0")]
#[case("|+-")]
#[case(">-+")]
#[case("|02")]
#[case("|22")]
#[case(">22")]
#[case("echo hi")]
fn run_rejects_invalid_values(#[case] value: &str) {
    let text = format!("- shell: bash\n  run: {value}\n    echo hi\n");
    assert!(scan(&text, &Grammar::run_shell()).is_empty());
}

#[test]
fn multi_digit_indicators_are_opt_in() {
    let mut grammar = Grammar::run_shell();
    if let EmbedRule::ShellDeclared { indent_digits, .. } = &mut grammar.embed {
        *indent_digits = IndentDigits::Multi;
    }
    let text = "- shell: bash\n  run: |22\n    echo hi";
    let report = scan(text, &grammar);
    assert_eq!(spans(&report), vec![(2, Some(3), Some(3), "shellscript")]);
    assert_eq!(report.blocks[0].header.indent, Some(22));
}

#[test]
fn unclaimed_run_block_hides_its_body() {
    // The unknown-shell block absorbs the lookalike step below it.
    let text = "\
- shell: fish
  run: |
    - shell: bash
      run: |
        echo inner
- shell: bash
  run: |
    echo outer";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(spans(&report), vec![(7, Some(8), Some(8), "shellscript")]);
}

#[test]
fn run_must_be_a_direct_step_sibling() {
    let text = "\
- shell: bash
  with:
    run: |
      echo nested
";
    assert!(scan(text, &Grammar::run_shell()).is_empty());
}

#[test]
fn custom_language_list_is_honoured() {
    let mut grammar = Grammar::run_shell();
    if let EmbedRule::ShellDeclared { languages, .. } = &mut grammar.embed {
        languages.retain(|l| l.name == "shell-python");
    }
    let text = "\
- shell: bash
  run: |
    echo hi
- shell: python
  run: |
    print('hi')";
    let report = scan(text, &grammar);
    assert_eq!(spans(&report), vec![(5, Some(6), Some(6), "python")]);
}

// Regions

#[test]
fn regions_are_ordered_by_line() {
    let report = scan(TWO_SCRIPT_STEPS, &Grammar::github_script_params());
    let regions: Vec<_> = report
        .regions()
        .into_iter()
        .map(|r| (r.role, r.lines, r.language))
        .collect();

    let header = |line| (RegionRole::Header, LineRange::single(line), None);
    let body = |first, last| {
        (
            RegionRole::EmbeddedBody,
            LineRange { first, last },
            Some("javascript".to_string()),
        )
    };
    assert_eq!(
        regions,
        vec![
            header(2),
            header(3),
            header(4),
            body(5, 8),
            header(9),
            header(10),
            header(11),
            body(12, 14),
        ]
    );
}

#[test]
fn block_scope_names_the_language() {
    let text = "- shell: python\n  run: |\n    pass\n";
    let report = scan(text, &Grammar::run_shell());
    assert_eq!(report.blocks[0].scope(), "meta.embedded.block.python");
}

use crate::{document::Document, scan::ScanReport};

pub fn check(doc: &Document, report: &ScanReport) {
    let n = doc.line_count();

    let headers: Vec<usize> = report
        .steps
        .iter()
        .map(|s| s.line)
        .chain(report.nested_keys.iter().map(|k| k.line))
        .chain(report.blocks.iter().map(|b| b.header_line))
        .collect();
    for &line in &headers {
        assert!(
            (1..=n).contains(&line),
            "header line {line} out of bounds (line count: {n})"
        );
    }

    let mut previous = None;
    let mut previous_body = None;
    for b in &report.blocks {
        if let Some(prev) = previous {
            assert!(
                b.header_line > prev,
                "blocks out of order: header {} after {}",
                b.header_line,
                prev
            );
        }
        previous = b.body.map(|body| body.last).or(Some(b.header_line));

        let Some(body) = b.body else {
            continue;
        };
        if let Some(prev) = previous_body {
            assert!(
                !body.overlaps(prev),
                "body {body:?} overlaps previous body {prev:?}"
            );
        }
        previous_body = Some(body);
        assert_eq!(
            body.first,
            b.header_line + 1,
            "body does not start right after header {}",
            b.header_line
        );
        assert!(
            body.first <= body.last && body.last <= n,
            "body out of bounds: {body:?} (line count: {n})"
        );
        for &line in &headers {
            assert!(
                !body.contains(line),
                "header line {line} inside body {body:?}"
            );
        }
    }
}

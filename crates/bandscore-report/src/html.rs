//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use bandscore_core::report::ScoreReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a score report.
pub fn generate_html(report: &ScoreReport) -> String {
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>bandscore report — {}</title>\n",
        html_escape(&report.test_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>bandscore report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Test: <strong>{}</strong> | {} | {} questions | {}</p>\n",
        html_escape(&report.test_name),
        summary.section_type,
        summary.total_questions,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"band\">Band <strong>{}</strong></p>\n",
        summary.band_score
    ));
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Section</th><th>Correct</th><th>Accuracy</th><th>Conversion</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{}</td><td>{}/{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
        summary.section_type,
        summary.raw_correct_count,
        summary.total_questions,
        summary.accuracy() * 100.0,
        report.strategy,
    ));
    html.push_str("</tbody></table>\n");

    if !report.insights.passages.is_empty() {
        html.push_str("<h3>By passage</h3>\n");
        html.push_str("<table class=\"passages\">\n");
        html.push_str("<thead><tr><th>Passage</th><th>Correct</th><th>Accuracy</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for p in &report.insights.passages {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}/{}</td><td>{:.1}%</td></tr>\n",
                p.passage, p.correct, p.total, p.accuracy_percent
            ));
        }
        html.push_str("</tbody></table>\n");
    }

    if let Some(timing) = &report.insights.timing {
        html.push_str(&format!(
            "<p class=\"meta\">Time: {:.0}s total, {:.1}s per question",
            timing.total_secs, timing.mean_secs
        ));
        if let Some((id, secs)) = timing.slowest {
            html.push_str(&format!(", slowest Q{id} ({secs:.0}s)"));
        }
        html.push_str("</p>\n");
    }

    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Your answer</th><th onclick=\"sortTable(2)\">Correct answer</th><th onclick=\"sortTable(3)\">Result</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for m in &report.marks {
        let class = if m.is_correct { "pass" } else { "fail" };
        let result_text = if m.is_correct { "OK" } else { "WRONG" };
        let given = if m.user_answer.trim().is_empty() {
            "-".to_string()
        } else {
            html_escape(&m.user_answer)
        };

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            m.question_id,
            given,
            html_escape(&m.correct_answer),
            result_text
        ));
    }

    html.push_str("</tbody></table>\n");

    if !report.insights.review.is_empty() {
        let list: Vec<String> = report
            .insights
            .review
            .iter()
            .map(|id| id.to_string())
            .collect();
        html.push_str(&format!(
            "<p class=\"review\">Review questions: {}</p>\n",
            list.join(", ")
        ));
    }
    if !report.insights.unanswered.is_empty() {
        html.push_str(&format!(
            "<p class=\"review\">{} question(s) left blank.</p>\n",
            report.insights.unanswered.len()
        ));
    }

    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ScoreReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.band { font-size: 1.5rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = Number(va), nb = Number(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

//! Advisory shell analysis with `shellcheck`.
//!
//! Findings are informational only. Every failure to run the tool or read
//! its checkstyle report becomes [`SupplementaryReport::Unavailable`] so the
//! caller can mention it and carry on.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use vedit_filetype::{TypeKey, read_first_line, shebang_type};

use crate::tool::run_tool;

const SHELLCHECK_TARGET: &str = "vedit_checkers::shellcheck";
const XML_START: &str = "<?xml";
const XML_END: &str = "</checkstyle>";

/// An extra, non-blocking analysis run after the main check passes.
pub trait SupplementaryCheck: Send + Sync + fmt::Debug {
    /// Returns true when the analysis is meaningful for the file at `path`,
    /// which was checked as `key`.
    fn applies_to(&self, key: TypeKey, path: &Path) -> bool;

    /// Analyses the file at `path`.
    fn run(&self, path: &Path) -> SupplementaryReport;
}

/// Returns true when the first line of `path` names a shell interpreter.
fn has_shell_directive(path: &Path) -> bool {
    read_first_line(path)
        .ok()
        .flatten()
        .and_then(|line| shebang_type(&line))
        == Some(TypeKey::Shell)
}

/// One finding reported by the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    /// One-based line, when reported.
    pub line: Option<u32>,
    /// One-based column, when reported.
    pub column: Option<u32>,
    /// Tool severity label, e.g. `warning`.
    pub severity: String,
    /// Finding text.
    pub message: String,
    /// Rule identifier, e.g. `ShellCheck.SC2086`.
    pub source: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.severity.to_ascii_uppercase())?;
        if let Some(line) = self.line {
            write!(f, " line {line}")?;
            if let Some(column) = self.column {
                write!(f, ", column {column}")?;
            }
        }
        write!(f, ": {}", self.message)?;
        if !self.source.is_empty() {
            write!(f, " ({})", self.source)?;
        }
        Ok(())
    }
}

/// Result of a supplementary analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplementaryReport {
    /// The analysis ran; the list may be empty.
    Findings(Vec<Advisory>),
    /// The analysis could not run or its output could not be read.
    Unavailable(String),
}

impl SupplementaryReport {
    /// Lowest line number among the findings.
    #[must_use]
    pub fn first_line(&self) -> Option<u32> {
        match self {
            Self::Findings(advisories) => advisories.iter().filter_map(|a| a.line).min(),
            Self::Unavailable(_) => None,
        }
    }
}

/// Runs `shellcheck --format=checkstyle` against shell scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shellcheck {
    severity: String,
    shell: String,
}

impl Shellcheck {
    /// Analysis at minimum `severity` for the `shell` dialect.
    #[must_use]
    pub fn new(severity: impl Into<String>, shell: impl Into<String>) -> Self {
        Self {
            severity: severity.into(),
            shell: shell.into(),
        }
    }

    fn arguments(&self, path: &Path) -> Vec<OsString> {
        vec![
            OsString::from("--format=checkstyle"),
            OsString::from(format!("--shell={}", self.shell)),
            OsString::from(format!("--severity={}", self.severity)),
            path.as_os_str().to_owned(),
        ]
    }
}

impl SupplementaryCheck for Shellcheck {
    fn applies_to(&self, key: TypeKey, path: &Path) -> bool {
        key == TypeKey::Shell || has_shell_directive(path)
    }

    fn run(&self, path: &Path) -> SupplementaryReport {
        // shellcheck exits non-zero whenever it has findings, so the status
        // says nothing about whether the report is usable.
        let output = match run_tool("shellcheck", self.arguments(path)) {
            Ok(output) => output,
            Err(err) => return SupplementaryReport::Unavailable(err.to_string()),
        };
        match parse_checkstyle(output.stdout()) {
            Ok(advisories) => {
                debug!(
                    target: SHELLCHECK_TARGET,
                    findings = advisories.len(),
                    "shellcheck finished"
                );
                SupplementaryReport::Findings(advisories)
            }
            Err(reason) => {
                let diagnostics = output.diagnostics();
                SupplementaryReport::Unavailable(if diagnostics.is_empty() {
                    reason
                } else {
                    format!("{reason}: {diagnostics}")
                })
            }
        }
    }
}

/// Cuts the checkstyle document out of surrounding output.
fn extract_document(output: &str) -> Result<&str, String> {
    let truncated = || String::from("shellcheck report is truncated");
    let start = output
        .find(XML_START)
        .ok_or_else(|| String::from("shellcheck printed no checkstyle report"))?;
    let tail = output.get(start..).ok_or_else(truncated)?;
    let end = tail.find(XML_END).ok_or_else(truncated)?;
    tail.get(..end + XML_END.len()).ok_or_else(truncated)
}

/// Reads every `<error>` element of a checkstyle report.
///
/// # Errors
///
/// Returns a description when the report is missing or malformed.
pub fn parse_checkstyle(output: &str) -> Result<Vec<Advisory>, String> {
    let document = extract_document(output)?;
    let mut reader = Reader::from_str(document);
    let mut advisories = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element))
                if element.name().as_ref() == b"error" =>
            {
                advisories.push(advisory_from(&element)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(format!("unreadable shellcheck report: {err}")),
        }
    }
    Ok(advisories)
}

fn advisory_from(element: &BytesStart<'_>) -> Result<Advisory, String> {
    let mut advisory = Advisory {
        line: None,
        column: None,
        severity: String::new(),
        message: String::new(),
        source: String::new(),
    };
    for entry in element.attributes() {
        let attribute = entry.map_err(|err| format!("unreadable attribute: {err}"))?;
        let value = attribute
            .unescape_value()
            .map_err(|err| format!("unreadable attribute: {err}"))?
            .into_owned();
        match attribute.key.as_ref() {
            b"line" => advisory.line = value.parse().ok(),
            b"column" => advisory.column = value.parse().ok(),
            b"severity" => advisory.severity = value,
            b"message" => advisory.message = value,
            b"source" => advisory.source = value,
            _ => {}
        }
    }
    Ok(advisory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const REPORT: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<checkstyle version='4.5'>
<file name='deploy.sh' >
<error line='7' column='6' severity='info' message='Double quote to prevent globbing and word splitting.' source='ShellCheck.SC2086' />
<error line='3' column='1' severity='warning' message='foo appears unused. Verify use (or export if used externally).' source='ShellCheck.SC2034' />
</file>
</checkstyle>
"#;

    #[test]
    fn parses_advisories_in_report_order() {
        let advisories = parse_checkstyle(REPORT).expect("valid report");
        assert_eq!(advisories.len(), 2);
        assert_eq!(advisories[0].line, Some(7));
        assert_eq!(advisories[0].column, Some(6));
        assert_eq!(advisories[0].severity, "info");
        assert_eq!(advisories[1].source, "ShellCheck.SC2034");
    }

    #[test]
    fn first_line_is_the_lowest() {
        let report = SupplementaryReport::Findings(parse_checkstyle(REPORT).expect("report"));
        assert_eq!(report.first_line(), Some(3));
    }

    #[test]
    fn surrounding_noise_is_ignored() {
        let noisy = format!("warning: something\n{REPORT}trailing");
        assert_eq!(parse_checkstyle(&noisy).expect("report").len(), 2);
    }

    #[rstest]
    #[case("")]
    #[case("<?xml version='1.0'?><checkstyle>")]
    fn missing_or_truncated_reports_are_rejected(#[case] output: &str) {
        assert!(parse_checkstyle(output).is_err());
    }

    #[test]
    fn empty_report_has_no_findings() {
        let report = "<?xml version='1.0' encoding='UTF-8'?>\n<checkstyle version='4.5'>\n</checkstyle>\n";
        assert!(parse_checkstyle(report).expect("report").is_empty());
    }

    #[test]
    fn advisory_display_includes_location_and_rule() {
        let advisory = Advisory {
            line: Some(3),
            column: Some(1),
            severity: String::from("warning"),
            message: String::from("foo appears unused."),
            source: String::from("ShellCheck.SC2034"),
        };
        assert_eq!(
            advisory.to_string(),
            "[WARNING] line 3, column 1: foo appears unused. (ShellCheck.SC2034)"
        );
    }

    #[rstest]
    #[case(TypeKey::Shell, "echo hi\n", true)]
    #[case(TypeKey::Python, "print('hi')\n", false)]
    #[case(TypeKey::Ini, "#!/bin/bash\necho hi\n", true)]
    #[case(TypeKey::Markdown, "#!/usr/bin/env python3\n", false)]
    fn applies_to_shell_keys_and_shell_directives(
        #[case] key: TypeKey,
        #[case] content: &str,
        #[case] expected: bool,
    ) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("staged.conf");
        std::fs::write(&path, content).expect("write");
        let check = Shellcheck::new("style", "bash");
        assert_eq!(check.applies_to(key, &path), expected);
    }

    #[test]
    fn arguments_select_checkstyle_output() {
        let check = Shellcheck::new("style", "bash");
        assert_eq!(
            check.arguments(Path::new("x.sh")),
            ["--format=checkstyle", "--shell=bash", "--severity=style", "x.sh"]
                .map(OsString::from)
                .to_vec()
        );
    }
}

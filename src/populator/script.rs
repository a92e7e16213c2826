//! Splitting SQL scripts into executable statements.
//!
//! Separators, comment prefixes and block comment delimiters are only honoured
//! outside quoted literals. Whitespace outside literals collapses to one space.

use crate::error::ScriptError;

pub const DEFAULT_STATEMENT_SEPARATOR: &str = ";";
/// Used when the script never contains the configured separator.
pub const FALLBACK_STATEMENT_SEPARATOR: &str = "\n";
/// Never appears in a script, so the whole script becomes one statement.
pub const EOF_STATEMENT_SEPARATOR: &str = "^^^ END OF SCRIPT ^^^";
pub const DEFAULT_COMMENT_PREFIX: &str = "--";
pub const DEFAULT_BLOCK_COMMENT_START: &str = "/*";
pub const DEFAULT_BLOCK_COMMENT_END: &str = "*/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSettings {
    pub separator: String,
    pub comment_prefixes: Vec<String>,
    pub block_comment_start: String,
    pub block_comment_end: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_STATEMENT_SEPARATOR.to_string(),
            comment_prefixes: vec![DEFAULT_COMMENT_PREFIX.to_string()],
            block_comment_start: DEFAULT_BLOCK_COMMENT_START.to_string(),
            block_comment_end: DEFAULT_BLOCK_COMMENT_END.to_string(),
        }
    }
}

/// Split `script` into trimmed, non-empty statements.
pub fn split_statements(script: &str, settings: &ScriptSettings) -> Result<Vec<String>, ScriptError> {
    if settings.separator.is_empty() {
        return Err(ScriptError::EmptySeparator);
    }
    if !settings.block_comment_start.is_empty() && settings.block_comment_end.is_empty() {
        return Err(ScriptError::EmptyBlockCommentEnd {
            start: settings.block_comment_start.clone(),
        });
    }

    let scanned = scan(script, &settings.separator, settings)?;
    if scanned.separator_seen || settings.separator == EOF_STATEMENT_SEPARATOR {
        return Ok(scanned.statements);
    }
    Ok(scan(script, FALLBACK_STATEMENT_SEPARATOR, settings)?.statements)
}

struct Scanned {
    statements: Vec<String>,
    separator_seen: bool,
}

fn scan(script: &str, separator: &str, settings: &ScriptSettings) -> Result<Scanned, ScriptError> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut separator_seen = false;
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut in_escape = false;

    let mut i = 0;
    while i < script.len() {
        let rest = &script[i..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if in_escape {
            in_escape = false;
            current.push(c);
            i += c.len_utf8();
            continue;
        }
        if c == '\\' && (in_single_quote || in_double_quote) {
            in_escape = true;
            current.push(c);
            i += c.len_utf8();
            continue;
        }

        if !in_double_quote && c == '\'' {
            in_single_quote = !in_single_quote;
        } else if !in_single_quote && c == '"' {
            in_double_quote = !in_double_quote;
        } else if !in_single_quote && !in_double_quote {
            if rest.starts_with(separator) {
                separator_seen = true;
                flush(&mut current, &mut statements);
                i += separator.len();
                continue;
            }
            if settings
                .comment_prefixes
                .iter()
                .any(|p| !p.is_empty() && rest.starts_with(p.as_str()))
            {
                // Leave the newline in place; it may be the separator.
                match rest.find('\n') {
                    Some(eol) => {
                        i += eol;
                        continue;
                    }
                    None => break,
                }
            }
            if !settings.block_comment_start.is_empty()
                && rest.starts_with(settings.block_comment_start.as_str())
            {
                let body = &rest[settings.block_comment_start.len()..];
                match body.find(settings.block_comment_end.as_str()) {
                    Some(end) => {
                        i += settings.block_comment_start.len()
                            + end
                            + settings.block_comment_end.len();
                        push_space(&mut current);
                        continue;
                    }
                    None => {
                        return Err(ScriptError::UnterminatedBlockComment {
                            delimiter: settings.block_comment_end.clone(),
                        });
                    }
                }
            }
            if c.is_whitespace() {
                push_space(&mut current);
                i += c.len_utf8();
                continue;
            }
        }

        current.push(c);
        i += c.len_utf8();
    }
    flush(&mut current, &mut statements);

    Ok(Scanned {
        statements,
        separator_seen,
    })
}

fn push_space(current: &mut String) {
    if !current.is_empty() && !current.ends_with(' ') {
        current.push(' ');
    }
}

fn flush(current: &mut String, statements: &mut Vec<String>) {
    let stmt = current.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(script: &str) -> Vec<String> {
        split_statements(script, &ScriptSettings::default()).unwrap()
    }

    #[test]
    fn splits_on_separator_and_collapses_whitespace() {
        let stmts = split(
            "CREATE TABLE t (\n    id INTEGER,\n    name TEXT\n);\n\nINSERT INTO t VALUES (1, 'a');\n",
        );
        assert_eq!(
            stmts,
            vec![
                "CREATE TABLE t ( id INTEGER, name TEXT )",
                "INSERT INTO t VALUES (1, 'a')",
            ]
        );
    }

    #[test]
    fn separators_inside_literals_are_kept() {
        let stmts = split(r#"INSERT INTO t VALUES ('a;b', "c;d"); INSERT INTO t VALUES ('it''s; fine');"#);
        assert_eq!(
            stmts,
            vec![
                r#"INSERT INTO t VALUES ('a;b', "c;d")"#,
                "INSERT INTO t VALUES ('it''s; fine')",
            ]
        );
    }

    #[test]
    fn whitespace_inside_literals_is_preserved() {
        let stmts = split("INSERT INTO t VALUES ('two  spaces\nand a newline');");
        assert_eq!(stmts, vec!["INSERT INTO t VALUES ('two  spaces\nand a newline')"]);
    }

    #[test]
    fn backslash_escapes_do_not_close_literals() {
        let stmts = split(r"INSERT INTO t VALUES ('a\';b'); SELECT 1;");
        assert_eq!(stmts, vec![r"INSERT INTO t VALUES ('a\';b')", "SELECT 1"]);
    }

    #[test]
    fn comments_are_stripped() {
        let stmts = split(
            "-- leading comment; with separator\nSELECT 1; /* block; comment */ SELECT 2 -- trailing\n;",
        );
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn comment_markers_inside_literals_are_kept() {
        let stmts = split("INSERT INTO t VALUES ('-- not a comment', '/* nor this */');");
        assert_eq!(
            stmts,
            vec!["INSERT INTO t VALUES ('-- not a comment', '/* nor this */')"]
        );
    }

    #[test]
    fn falls_back_to_newline_when_separator_absent() {
        let stmts = split("INSERT INTO t VALUES (1)\nINSERT INTO t VALUES (2)\n\n-- done\n");
        assert_eq!(
            stmts,
            vec!["INSERT INTO t VALUES (1)", "INSERT INTO t VALUES (2)"]
        );
    }

    #[test]
    fn separator_in_comment_does_not_prevent_fallback() {
        let stmts = split("-- a; b\nSELECT 1\nSELECT 2");
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn end_of_script_separator_yields_single_statement() {
        let settings = ScriptSettings {
            separator: EOF_STATEMENT_SEPARATOR.to_string(),
            ..ScriptSettings::default()
        };
        let stmts = split_statements(
            "CREATE TRIGGER tr AFTER INSERT ON t BEGIN\n  UPDATE t SET n = 1;\nEND;",
            &settings,
        )
        .unwrap();
        assert_eq!(
            stmts,
            vec!["CREATE TRIGGER tr AFTER INSERT ON t BEGIN UPDATE t SET n = 1; END;"]
        );
    }

    #[test]
    fn custom_separator_and_comment_prefix() {
        let settings = ScriptSettings {
            separator: "GO".to_string(),
            comment_prefixes: vec!["#".to_string(), "--".to_string()],
            ..ScriptSettings::default()
        };
        let stmts = split_statements("SELECT 1\nGO\n# note\nSELECT 2\nGO", &settings).unwrap();
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let err = split_statements("SELECT 1; /* never closed", &ScriptSettings::default())
            .unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnterminatedBlockComment {
                delimiter: "*/".to_string()
            }
        );
    }

    #[test]
    fn empty_separator_is_rejected() {
        let settings = ScriptSettings {
            separator: String::new(),
            ..ScriptSettings::default()
        };
        assert_eq!(
            split_statements("SELECT 1", &settings).unwrap_err(),
            ScriptError::EmptySeparator
        );
    }

    #[test]
    fn empty_block_comment_end_is_rejected_up_front() {
        let settings = ScriptSettings {
            block_comment_end: String::new(),
            ..ScriptSettings::default()
        };
        assert_eq!(
            split_statements("SELECT 1; /* note */ SELECT 2;", &settings).unwrap_err(),
            ScriptError::EmptyBlockCommentEnd {
                start: "/*".to_string()
            }
        );

        let no_block_comments = ScriptSettings {
            block_comment_start: String::new(),
            block_comment_end: String::new(),
            ..ScriptSettings::default()
        };
        assert_eq!(
            split_statements("SELECT 1; SELECT 2;", &no_block_comments).unwrap(),
            vec!["SELECT 1", "SELECT 2"]
        );
    }

    #[test]
    fn empty_and_comment_only_scripts_have_no_statements() {
        assert!(split("").is_empty());
        assert!(split("  \n\t").is_empty());
        assert!(split("-- only a comment\n/* and a block */").is_empty());
    }

}

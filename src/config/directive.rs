//! Directive file parsing.
//!
//! Packages can be declared in a compact line-oriented format instead of TOML:
//!
//! ```text
//! # comment
//! gopkg /caddy/gopkg https://github.com/org/gopkg
//! gopkg /tools hg https://hg.example.com/tools {
//!     submodule /cmd https://hg.example.com/cmd
//!     submodule /lib
//! }
//! ```
//!
//! A `gopkg` line takes a path, an optional VCS and a URI. The optional block
//! holds `submodule <subpath> [<suburi>]` entries.

use thiserror::Error;

use crate::config::schema::{PackageConfig, SubmoduleConfig};

/// Errors raised while parsing a directive file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("line {line}: wrong number of arguments for '{directive}'")]
    ArgCount { line: usize, directive: String },

    #[error("line {line}: unrecognized directive '{name}'")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: unrecognized subdirective '{name}'")]
    UnknownSubdirective { line: usize, name: String },

    #[error("line {line}: unexpected '{token}'")]
    Unexpected { line: usize, token: String },

    #[error("line {line}: unterminated quoted string")]
    UnterminatedQuote { line: usize },

    #[error("block opened on line {line} is never closed")]
    UnclosedBlock { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    line: usize,
    quoted: bool,
}

impl Token {
    fn is(&self, brace: &str) -> bool {
        !self.quoted && self.text == brace
    }
}

/// Parse every `gopkg` directive in `source`.
pub fn parse_directives(source: &str) -> Result<Vec<PackageConfig>, DirectiveError> {
    let lines = group_by_line(tokenize(source)?);
    let mut packages = Vec::new();
    let mut iter = lines.into_iter();

    while let Some(tokens) = iter.next() {
        let head = &tokens[0];
        if head.is("}") || head.is("{") {
            return Err(DirectiveError::Unexpected {
                line: head.line,
                token: head.text.clone(),
            });
        }
        if head.text != "gopkg" {
            return Err(DirectiveError::UnknownDirective {
                line: head.line,
                name: head.text.clone(),
            });
        }

        let line = head.line;
        let mut args = &tokens[1..];
        let opens_block = args.last().is_some_and(|t| t.is("{"));
        if opens_block {
            args = &args[..args.len() - 1];
        }
        if let Some(brace) = args.iter().find(|t| t.is("{") || t.is("}")) {
            return Err(unexpected(brace));
        }

        let mut package = match args {
            [path, url] => PackageConfig {
                path: path.text.clone(),
                url: url.text.clone(),
                ..Default::default()
            },
            [path, vcs, url] => PackageConfig {
                path: path.text.clone(),
                vcs: vcs.text.clone(),
                url: url.text.clone(),
                ..Default::default()
            },
            _ => {
                return Err(DirectiveError::ArgCount {
                    line,
                    directive: "gopkg".into(),
                })
            }
        };

        if opens_block {
            package.submodules = parse_block(line, &mut iter)?;
        }
        packages.push(package);
    }

    Ok(packages)
}

fn parse_block(
    opened_on: usize,
    lines: &mut impl Iterator<Item = Vec<Token>>,
) -> Result<Vec<SubmoduleConfig>, DirectiveError> {
    let mut submodules = Vec::new();

    for tokens in lines {
        let head = &tokens[0];
        if head.is("}") {
            if let Some(extra) = tokens.get(1) {
                return Err(unexpected(extra));
            }
            return Ok(submodules);
        }
        if head.text != "submodule" {
            return Err(DirectiveError::UnknownSubdirective {
                line: head.line,
                name: head.text.clone(),
            });
        }
        if let Some(brace) = tokens.iter().find(|t| t.is("{") || t.is("}")) {
            return Err(unexpected(brace));
        }

        let submodule = match &tokens[1..] {
            [path] => SubmoduleConfig {
                path: path.text.clone(),
                url: String::new(),
            },
            [path, url] => SubmoduleConfig {
                path: path.text.clone(),
                url: url.text.clone(),
            },
            _ => {
                return Err(DirectiveError::ArgCount {
                    line: head.line,
                    directive: "submodule".into(),
                })
            }
        };
        submodules.push(submodule);
    }

    Err(DirectiveError::UnclosedBlock { line: opened_on })
}

fn unexpected(token: &Token) -> DirectiveError {
    DirectiveError::Unexpected {
        line: token.line,
        token: token.text.clone(),
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, DirectiveError> {
    let mut tokens = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let mut chars = raw.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else if c == '#' {
                break;
            } else if c == '"' {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' if chars.peek() == Some(&'"') => {
                            text.push('"');
                            chars.next();
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => text.push(c),
                    }
                }
                if !closed {
                    return Err(DirectiveError::UnterminatedQuote { line });
                }
                tokens.push(Token {
                    text,
                    line,
                    quoted: true,
                });
            } else {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                tokens.push(Token {
                    text,
                    line,
                    quoted: false,
                });
            }
        }
    }

    Ok(tokens)
}

fn group_by_line(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut lines: Vec<Vec<Token>> = Vec::new();
    for token in tokens {
        match lines.last_mut() {
            Some(current) if current[0].line == token.line => current.push(token),
            _ => lines.push(vec![token]),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_defaults_vcs_to_empty() {
        let packages = parse_directives("gopkg /caddy/gopkg https://github.com/org/gopkg").unwrap();
        assert_eq!(
            packages,
            vec![PackageConfig {
                path: "/caddy/gopkg".into(),
                url: "https://github.com/org/gopkg".into(),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn test_vcs_and_block() {
        let source = r#"
            # tools live in mercurial
            gopkg /tools hg https://hg.example.com/tools {
                submodule /cmd https://hg.example.com/cmd
                submodule "/lib"   # inherits
            }
            gopkg /other https://git.example.com/other
        "#;

        let packages = parse_directives(source).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].vcs, "hg");
        assert_eq!(
            packages[0].submodules,
            vec![
                SubmoduleConfig {
                    path: "/cmd".into(),
                    url: "https://hg.example.com/cmd".into(),
                },
                SubmoduleConfig {
                    path: "/lib".into(),
                    url: String::new(),
                },
            ]
        );
        assert!(packages[1].submodules.is_empty());
    }

    #[test]
    fn test_argument_count_errors() {
        assert_eq!(
            parse_directives("gopkg /only").unwrap_err(),
            DirectiveError::ArgCount {
                line: 1,
                directive: "gopkg".into()
            }
        );
        assert_eq!(
            parse_directives("gopkg /a git https://x extra").unwrap_err(),
            DirectiveError::ArgCount {
                line: 1,
                directive: "gopkg".into()
            }
        );
        assert_eq!(
            parse_directives("gopkg /a https://x {\n  submodule\n}").unwrap_err(),
            DirectiveError::ArgCount {
                line: 2,
                directive: "submodule".into()
            }
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            parse_directives("redir /a /b").unwrap_err(),
            DirectiveError::UnknownDirective {
                line: 1,
                name: "redir".into()
            }
        );
        assert_eq!(
            parse_directives("gopkg /a https://x {\n  module /b\n}").unwrap_err(),
            DirectiveError::UnknownSubdirective {
                line: 2,
                name: "module".into()
            }
        );
        assert_eq!(
            parse_directives("gopkg /a https://x {\n  submodule /b\n").unwrap_err(),
            DirectiveError::UnclosedBlock { line: 1 }
        );
        assert_eq!(
            parse_directives("}").unwrap_err(),
            DirectiveError::Unexpected {
                line: 1,
                token: "}".into()
            }
        );
        assert_eq!(
            parse_directives("gopkg \"/a https://x").unwrap_err(),
            DirectiveError::UnterminatedQuote { line: 1 }
        );
    }
}

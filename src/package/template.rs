//! Response templates.
//!
//! Templates are plain text with `{{.Field}}` actions. Parsing only checks
//! action syntax; field names are looked up at execution time, so a template
//! referring to an unknown field compiles but fails to render.
//!
//! Go-style trim markers (`{{- .Host -}}`) strip the whitespace on that side
//! of the action, and `{{/* ... */}}` comments render nothing. Pipelines,
//! conditionals and other actions are rejected when the template is parsed.

use thiserror::Error;

/// The built-in metadata page.
///
/// The `go-import` meta tag shape is consumed by the go tool and must not change.
pub const DEFAULT_TEMPLATE: &str = r#"<html>
<head>
<meta name="go-import" content="{{.Host}}{{.Path}} {{.Vcs}} {{.URL}}">
</head>
<body>
go get {{.Host}}{{.Path}}
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template {name}: unclosed action starting at byte {offset}")]
    Unclosed { name: String, offset: usize },

    #[error("template {name}: unsupported action '{action}' at byte {offset}")]
    Unsupported {
        name: String,
        action: String,
        offset: usize,
    },

    #[error("template {name}: can't evaluate field {field}")]
    UnknownField { name: String, field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// Values available to a template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateData<'a> {
    pub host: &'a str,
    pub path: &'a str,
    pub vcs: &'a str,
    pub url: &'a str,
}

impl TemplateData<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "Host" => Some(self.host),
            "Path" => Some(self.path),
            "Vcs" => Some(self.vcs),
            "URL" => Some(self.url),
            _ => None,
        }
    }
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Compile `source`.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let name = name.into();
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;
        let mut trim_next = false;

        while let Some(start) = rest.find("{{") {
            let action_start = offset + start;
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| TemplateError::Unclosed {
                name: name.clone(),
                offset: action_start,
            })?;
            let (action, trim_before, trim_after) = trim_markers(&after[..end]);

            let mut text = &rest[..start];
            if trim_next {
                text = text.trim_start();
            }
            if trim_before {
                text = text.trim_end();
            }
            if !text.is_empty() {
                segments.push(Segment::Text(text.to_string()));
            }
            trim_next = trim_after;

            let action = action.trim();
            let is_comment =
                action.len() >= 4 && action.starts_with("/*") && action.ends_with("*/");
            if !is_comment {
                match action.strip_prefix('.') {
                    Some(field)
                        if !field.is_empty()
                            && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
                    {
                        segments.push(Segment::Field(field.to_string()));
                    }
                    _ => {
                        return Err(TemplateError::Unsupported {
                            name,
                            action: action.to_string(),
                            offset: action_start,
                        })
                    }
                }
            }

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        let tail = if trim_next { rest.trim_start() } else { rest };
        if !tail.is_empty() {
            segments.push(Segment::Text(tail.to_string()));
        }

        Ok(Self { name, segments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template into a complete document.
    ///
    /// Nothing is returned unless every action succeeds.
    pub fn execute(&self, data: &TemplateData<'_>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => {
                    let value = data.field(field).ok_or_else(|| TemplateError::UnknownField {
                        name: self.name.clone(),
                        field: field.clone(),
                    })?;
                    escape_html(value, &mut out);
                }
            }
        }
        Ok(out)
    }
}

/// Split `{{- ` and ` -}}` markers off an action body.
///
/// A marker needs whitespace between the dash and the action, so `{{-3}}`
/// is not a trim.
fn trim_markers(action: &str) -> (&str, bool, bool) {
    let mut body = action;
    let before = match body.strip_prefix('-') {
        Some(stripped) if stripped.starts_with(char::is_whitespace) => {
            body = stripped;
            true
        }
        _ => false,
    };
    let after = match body.strip_suffix('-') {
        Some(stripped) if stripped.ends_with(char::is_whitespace) => {
            body = stripped;
            true
        }
        _ => false,
    };
    (body, before, after)
}

fn escape_html(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> TemplateData<'static> {
        TemplateData {
            host: "example.com",
            path: "/caddy/gopkg",
            vcs: "git",
            url: "https://github.com/org/repo",
        }
    }

    #[test]
    fn test_default_template_go_import_tag() {
        let page = Template::parse("Package", DEFAULT_TEMPLATE)
            .unwrap()
            .execute(&data())
            .unwrap();
        assert!(page.contains(
            r#"<meta name="go-import" content="example.com/caddy/gopkg git https://github.com/org/repo">"#
        ));
        assert!(page.contains("go get example.com/caddy/gopkg"));
    }

    #[test]
    fn test_whitespace_inside_actions() {
        let template = Template::parse("t", "[{{ .Vcs }}]").unwrap();
        assert_eq!(template.execute(&data()).unwrap(), "[git]");
    }

    #[test]
    fn test_trim_markers() {
        let template = Template::parse("t", "a  \n {{- .Vcs -}} \n  b {{- .Vcs}} c").unwrap();
        assert_eq!(template.execute(&data()).unwrap(), "agitbgit c");

        let template = Template::parse("t", "{{.Host}}\n{{- /* joined */ -}}\n{{.Path}}").unwrap();
        assert_eq!(template.execute(&data()).unwrap(), "example.com/caddy/gopkg");
    }

    #[test]
    fn test_comments_render_nothing() {
        let template = Template::parse("t", "[{{/* vanity page */}}{{.Vcs}}]").unwrap();
        assert_eq!(template.execute(&data()).unwrap(), "[git]");
    }

    #[test]
    fn test_values_are_escaped() {
        let template = Template::parse("t", r#"<a href="{{.URL}}">"#).unwrap();
        let data = TemplateData {
            url: r#"https://x/?a=1&b="2""#,
            ..data()
        };
        assert_eq!(
            template.execute(&data).unwrap(),
            r#"<a href="https://x/?a=1&amp;b=&#34;2&#34;">"#
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Template::parse("t", "ok {{.Host").unwrap_err(),
            TemplateError::Unclosed {
                name: "t".into(),
                offset: 3
            }
        );
        assert!(matches!(
            Template::parse("t", "{{range .Items}}").unwrap_err(),
            TemplateError::Unsupported { .. }
        ));
        assert!(matches!(
            Template::parse("t", "{{.}}").unwrap_err(),
            TemplateError::Unsupported { .. }
        ));
        assert!(matches!(
            Template::parse("t", "{{-.Host}}").unwrap_err(),
            TemplateError::Unsupported { .. }
        ));
    }

    #[test]
    fn test_unknown_field_fails_at_execution() {
        let template = Template::parse("custom", "{{.Branch}}").unwrap();
        assert_eq!(
            template.execute(&data()).unwrap_err(),
            TemplateError::UnknownField {
                name: "custom".into(),
                field: "Branch".into()
            }
        );
    }
}

use crate::testcase::TestSheetError;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;

lazy_static! {
    static ref DIRECTIVE_REGEXP: Regex =
        Regex::new(r"^\s*&(?P<name>\w+)\((?P<args>.*)\)\s*$").unwrap();
}

/// Supplies the text of files referenced by `&include(...)` directives.
pub trait IncludeResolver {
    fn read_include(&self, name: &str) -> io::Result<String>;
}

/// Reads included files relative to a base directory.
#[derive(Debug, Clone)]
pub struct FsIncludeResolver {
    base_dir: PathBuf,
}

impl FsIncludeResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FsIncludeResolver {
            base_dir: base_dir.into(),
        }
    }
}

impl IncludeResolver for FsIncludeResolver {
    fn read_include(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.base_dir.join(name))
    }
}

/// Arguments of an `&include(...)` directive.
///
/// Every key other than `name` is a placeholder substitution.
#[derive(Debug, Deserialize)]
struct IncludeArgs {
    name: String,
    #[serde(flatten)]
    vars: IndexMap<String, serde_json::Value>,
}

/// Expands `&name(jsonArgs)` directive lines before the outline is parsed.
pub struct Preprocessor<R: IncludeResolver> {
    resolver: R,
}

impl<R: IncludeResolver> Preprocessor<R> {
    /// Creates a new `Preprocessor` reading includes through `resolver`.
    pub fn new(resolver: R) -> Self {
        Preprocessor { resolver }
    }

    /// Resolves all directives in `input`.
    ///
    /// Plain lines are copied with a trailing newline. An `include` directive
    /// is replaced by the referenced text with every `//**KEY**//` placeholder
    /// substituted. Directives with any other name produce no output.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if an included file cannot be read, and
    /// `InvalidDirective` if the include arguments are not a JSON object with
    /// a string `name`.
    pub fn process(&self, input: &str) -> Result<String, TestSheetError> {
        let mut output = String::with_capacity(input.len());

        for (index, line) in input.lines().enumerate() {
            let Some(captures) = DIRECTIVE_REGEXP.captures(line) else {
                output.push_str(line);
                output.push('\n');
                continue;
            };

            match &captures["name"] {
                "include" => {
                    let included = self.include(index + 1, &captures["args"])?;
                    output.push_str(&included);
                    // The directive stands for whole lines.
                    if !included.is_empty() && !included.ends_with('\n') {
                        output.push('\n');
                    }
                }
                other => debug!("ignoring unknown directive &{} at line {}", other, index + 1),
            }
        }

        Ok(output)
    }

    fn include(&self, line: usize, args: &str) -> Result<String, TestSheetError> {
        let args: IncludeArgs =
            serde_json::from_str(args).map_err(|e| TestSheetError::InvalidDirective {
                line,
                message: format!("include arguments: {}", e),
            })?;

        info!("including \"{}\" at line {}", args.name, line);
        let mut text = self
            .resolver
            .read_include(&args.name)
            .map_err(|source| TestSheetError::ResourceNotFound {
                name: args.name.clone(),
                source,
            })?;

        for (key, value) in &args.vars {
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            text = text.replace(&format!("//**{}**//", key), &replacement);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MemoryResolver(HashMap<String, String>);

    impl IncludeResolver for MemoryResolver {
        fn read_include(&self, name: &str) -> io::Result<String> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    fn preprocessor(files: &[(&str, &str)]) -> Preprocessor<MemoryResolver> {
        Preprocessor::new(MemoryResolver(
            files
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_plain_lines_pass_through() {
        let p = preprocessor(&[]);
        assert_eq!(p.process("# a\n:: b\nc").unwrap(), "# a\n:: b\nc\n");
    }

    #[test]
    fn test_include_substitutes_placeholders() {
        let p = preprocessor(&[(
            "common/login.md",
            "### login as //**user**//\n:: Steps\nenter //**user**// / //**pass**//\n",
        )]);
        let input = r#"# Auth
## Login
  &include({"name": "common/login.md", "user": "alice", "pass": "secret"})
## Logout
"#;
        let output = p.process(input).unwrap();
        assert_eq!(
            output,
            "# Auth\n## Login\n### login as alice\n:: Steps\nenter alice / secret\n## Logout\n"
        );
    }

    #[test]
    fn test_include_twice_expands_independently() {
        let p = preprocessor(&[("case.md", "### //**n**//\n")]);
        let input = "&include({\"name\": \"case.md\", \"n\": \"one\"})\n&include({\"name\": \"case.md\", \"n\": 2})";
        assert_eq!(p.process(input).unwrap(), "### one\n### 2\n");
    }

    #[test]
    fn test_include_without_trailing_newline_keeps_lines_apart() {
        let p = preprocessor(&[("steps.md", ":: Steps\nlog in"), ("empty.md", "")]);
        let input = "# A\n&include({\"name\": \"steps.md\"})\n:: Expected\nok\n&include({\"name\": \"empty.md\"})\nend";
        let output = p.process(input).unwrap();
        assert_eq!(output, "# A\n:: Steps\nlog in\n:: Expected\nok\nend\n");

        let records = crate::parser::markdown::MarkdownParser::new()
            .parse(&output)
            .unwrap();
        let sections = &records[0].sections;
        assert_eq!(sections["Steps"], vec!["log in".to_string()]);
        assert_eq!(sections["Expected"], vec!["ok".to_string(), "end".to_string()]);
    }

    #[test]
    fn test_unknown_directive_is_dropped() {
        let p = preprocessor(&[]);
        assert_eq!(p.process("a\n&macro({})\nb").unwrap(), "a\nb\n");
    }

    #[test]
    fn test_missing_include_is_resource_not_found() {
        let p = preprocessor(&[]);
        let err = p.process("&include({\"name\": \"nope.md\"})").unwrap_err();
        assert!(matches!(err, TestSheetError::ResourceNotFound { ref name, .. } if name == "nope.md"));
    }

    #[test]
    fn test_bad_include_arguments() {
        let p = preprocessor(&[]);
        let err = p.process("x\n&include(nope.md)").unwrap_err();
        assert!(matches!(err, TestSheetError::InvalidDirective { line: 2, .. }));

        let err = p.process("&include({\"user\": \"alice\"})").unwrap_err();
        assert!(matches!(err, TestSheetError::InvalidDirective { line: 1, .. }));
    }

    #[test]
    fn test_fs_resolver_reads_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("part.md"), "### //**id**//\n").unwrap();

        let p = Preprocessor::new(FsIncludeResolver::new(dir.path()));
        let output = p.process("&include({\"name\": \"part.md\", \"id\": \"x\"})").unwrap();
        assert_eq!(output, "### x\n");
    }
}

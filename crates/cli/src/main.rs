use clap::{Parser, Subcommand, ValueEnum};
use medsimplify_core::{RenderedContent, Segment, SimplifierService, TermDictionary, TermRecord};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "medsimplify")]
#[command(about = "Find medical jargon in text and explain it in plain language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simplify a text
    Simplify {
        /// Text to simplify
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,
        /// File to read the text from ('-' for stdin)
        #[arg(long)]
        input: Option<PathBuf>,
        /// JSON term list to use instead of the built-in dictionary
        #[arg(long)]
        dictionary: Option<PathBuf>,
        /// Which view to print
        #[arg(long, value_enum, default_value_t = View::Annotated)]
        view: View,
    },
    /// List the dictionary
    Terms {
        /// JSON term list to use instead of the built-in dictionary
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },
    /// Show one term's explanation
    Lookup {
        /// The term, any casing
        term: String,
        /// JSON term list to use instead of the built-in dictionary
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    /// Source text with terms in brackets, followed by their explanations
    Annotated,
    /// Terms replaced by their simplified phrases
    Substituted,
    /// Both views as HTML fragments
    Html,
    /// Segments and substituted text as JSON
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Simplify {
            text,
            input,
            dictionary,
            view,
        }) => {
            let text = match (text, input) {
                (Some(text), _) => text,
                (None, Some(path)) => read_input(&path)?,
                (None, None) => return Err("provide --text or --input".into()),
            };
            let dictionary = load_dictionary(dictionary.as_deref())?;
            let content = SimplifierService::new().simplify_with(text, &dictionary);
            print!("{}", render_view(&content, view)?);
        }
        Some(Commands::Terms { dictionary }) => {
            let dictionary = load_dictionary(dictionary.as_deref())?;
            if dictionary.is_empty() {
                println!("No terms found.");
            }
            for record in dictionary.records() {
                println!("{} -> {}", record.original, record.simplified);
            }
        }
        Some(Commands::Lookup { term, dictionary }) => {
            let dictionary = load_dictionary(dictionary.as_deref())?;
            match dictionary.lookup(&term) {
                Some(record) => print!("{}", describe(record)),
                None => return Err(format!("Term not found: {}", term).into()),
            }
        }
        None => {
            println!("Use 'medsimplify --help' for commands");
        }
    }

    Ok(())
}

fn load_dictionary(path: Option<&Path>) -> Result<TermDictionary, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => TermDictionary::from_json_file(path)?,
        None => TermDictionary::builtin(),
    })
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

fn render_view(content: &RenderedContent, view: View) -> serde_json::Result<String> {
    Ok(match view {
        View::Annotated => annotated(content),
        View::Substituted => format!("{}\n", content.substituted_text()),
        View::Html => format!(
            "{}\n{}\n",
            content.annotated_html(None),
            content.substituted_html()
        ),
        View::Json => {
            let value = serde_json::json!({
                "source_text": content.source_text(),
                "terms_count": content.terms_count(),
                "segments": content.segments(),
                "substituted_text": content.substituted_text(),
            });
            format!("{}\n", serde_json::to_string_pretty(&value)?)
        }
    })
}

fn annotated(content: &RenderedContent) -> String {
    let mut out = String::new();
    for segment in content.segments() {
        match segment {
            Segment::Text { text } => out.push_str(text),
            Segment::Term { text, .. } => {
                out.push('[');
                out.push_str(text);
                out.push(']');
            }
        }
    }
    out.push('\n');

    if !content.has_terms() {
        out.push_str("\nNo medical terms found.\n");
        return out;
    }

    out.push_str("\nTerms:\n");
    for record in content.distinct_terms() {
        out.push_str(&describe(&record));
    }
    out
}

fn describe(record: &TermRecord) -> String {
    let mut out = format!("  {} -> {}\n", record.original, record.simplified);
    if !record.definition.is_empty() {
        out.push_str(&format!("      {}\n", record.definition));
    }
    if let Some(link) = &record.reference_link {
        out.push_str(&format!("      {}\n", link));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn content(text: &str) -> RenderedContent {
        SimplifierService::new().simplify(
            text,
            vec![TermRecord::new(
                "dyspnea",
                "difficulty breathing",
                "Shortness of breath.",
                None,
            )],
        )
    }

    #[test]
    fn annotated_view_brackets_terms_and_lists_them() {
        let out = render_view(&content("Dyspnea at rest."), View::Annotated).unwrap();
        assert_eq!(
            out,
            "[Dyspnea] at rest.\n\nTerms:\n  dyspnea -> difficulty breathing\n      Shortness of breath.\n"
        );
    }

    #[test]
    fn annotated_view_without_terms() {
        let out = render_view(&content("Feels well."), View::Annotated).unwrap();
        assert_eq!(out, "Feels well.\n\nNo medical terms found.\n");
    }

    #[test]
    fn substituted_view() {
        let out = render_view(&content("Dyspnea at rest."), View::Substituted).unwrap();
        assert_eq!(out, "difficulty breathing at rest.\n");
    }

    #[test]
    fn json_view_contains_segments() {
        let out = render_view(&content("Dyspnea at rest."), View::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["terms_count"], 1);
        assert_eq!(value["segments"][0]["kind"], "term");
        assert_eq!(value["segments"][1]["text"], " at rest.");
    }

    #[test]
    fn html_view_escapes_source() {
        let out = render_view(&content("<b>dyspnea</b>"), View::Html).unwrap();
        assert!(out.contains("&lt;b&gt;"));
        assert!(!out.contains("<b>"));
    }

    #[test]
    fn load_dictionary_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"original": "MRI", "simplified": "magnetic scan"}}]"#).unwrap();

        let dictionary = load_dictionary(Some(file.path())).unwrap();
        assert_eq!(dictionary.len(), 1);
        assert!(load_dictionary(None).unwrap().lookup("edema").is_some());
    }

    #[test]
    fn cli_parses_simplify_arguments() {
        let cli = Cli::try_parse_from(["medsimplify", "simplify", "--text", "x", "--view", "json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Simplify { view: View::Json, .. })
        ));
        assert!(Cli::try_parse_from(["medsimplify", "simplify", "--text", "x", "--input", "f"]).is_err());
    }
}

use crate::cmt::{Query, QueryOutput};
use crate::model::Entry;
use colored::Colorize;
use miette::Result;

/// Terminal reporter printing records as an indented, colored tree
pub struct TerminalReporter {
    /// Show cmtpath / root next to each record
    show_paths: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_paths: true }
    }

    pub fn with_paths(mut self, show: bool) -> Self {
        self.show_paths = show;
        self
    }

    pub fn report(&self, query: Query, output: &QueryOutput<Vec<Entry>>) -> Result<()> {
        print!("{}", self.render(query, output));
        Ok(())
    }

    pub fn render(&self, query: Query, output: &QueryOutput<Vec<Entry>>) -> String {
        let mut lines = Vec::new();
        let entries = &output.value;

        if entries.is_empty() {
            let message = match query {
                Query::Missing => "No missing packages!".green().bold(),
                Query::Projects => "No projects reported.".yellow(),
                Query::Uses => "No uses reported.".yellow(),
            };
            lines.push(message.to_string());
        } else {
            lines.push(String::new());
            lines.push(
                format!("Found {} {}:", entries.len(), noun(query))
                    .yellow()
                    .bold()
                    .to_string(),
            );
            lines.push(String::new());

            for entry in entries {
                self.render_entry(&mut lines, entry, 1);
            }
        }

        if !output.success() {
            let status = output
                .status
                .map_or_else(|| "a signal".to_string(), |code| code.to_string());
            lines.push(String::new());
            lines.push(format!("⚠ cmt exited with status {}", status).yellow().to_string());
        }

        let mut rendered = lines.join("\n");
        rendered.push('\n');
        rendered
    }

    fn render_entry(&self, lines: &mut Vec<String>, entry: &Entry, depth: usize) {
        let indent = "  ".repeat(depth);

        let (kind, name, path) = match entry {
            Entry::Project(p) => ("project".cyan(), p.name.bold(), &p.cmtpath),
            Entry::Package(p) => (
                "package".magenta(),
                p.path().bold(),
                if p.root.is_empty() { &p.cmtpath } else { &p.root },
            ),
        };
        let label = format!("{} {} {}", kind, name, entry.version().dimmed());

        if self.show_paths && !path.is_empty() {
            lines.push(format!("{}{} {}", indent, label, format!("({})", path).dimmed()));
        } else {
            lines.push(format!("{}{}", indent, label));
        }

        for (name, children) in entry.children() {
            lines.push(format!("{}  {}", indent, format!("{}:", name).dimmed()));
            for child in children {
                self.render_entry(lines, child, depth + 2);
            }
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn noun(query: Query) -> &'static str {
    match query {
        Query::Projects => "projects",
        Query::Uses => "used projects and packages",
        Query::Missing => "missing packages",
    }
}

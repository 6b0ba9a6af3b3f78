//! Case notebooks generated from a Jupyter template
//!
//! The template is edited as JSON: cells are located by marker text in their
//! `source` lines and new cells are spliced into the `cells` array.

use serde_json::{Value, json};

use crate::constants::placeholder as ph;
use crate::error::{ClickHistError, Result};

/// What goes into one case notebook
#[derive(Debug, Clone, Default)]
pub struct NotebookContent {
    /// Creation time written over `INSERT_DATE`
    pub created: String,
    /// Lines appended under the Quick Stats heading
    pub stats: Vec<String>,
    pub common_name: String,
    /// Paths of the snapshot and quicklook images, relative to the notebook
    pub snapshot: Option<String>,
    pub quicklooks: Vec<String>,
    /// Bundle paths relative to the notebook
    pub bundles: Vec<String>,
}

fn markdown_cell(lines: Vec<String>) -> Value {
    json!({
        "cell_type": "markdown",
        "metadata": {},
        "source": lines,
    })
}

/// Source of a cell as individual lines, whichever form the file used
fn source_lines(cell: &Value) -> Vec<String> {
    match cell.get("source") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => s.split_inclusive('\n').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn set_source(cell: &mut Value, lines: Vec<String>) {
    if let Some(obj) = cell.as_object_mut() {
        obj.insert("source".to_string(), json!(lines));
    }
}

fn last_cell_containing(cells: &[Value], marker: &str) -> Option<usize> {
    cells
        .iter()
        .rposition(|c| source_lines(c).iter().any(|l| l.contains(marker)))
}

/// Fill a parsed template in place
pub fn fill(notebook: &mut Value, content: &NotebookContent) -> Result<()> {
    let cells = notebook
        .get_mut("cells")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| ClickHistError::config("notebook template has no cells array"))?;

    for cell in cells.iter_mut() {
        let lines = source_lines(cell);
        if lines.iter().any(|l| l.contains(ph::INSERT_DATE)) {
            let replaced = lines
                .into_iter()
                .map(|l| l.replace(ph::INSERT_DATE, &content.created))
                .collect();
            set_source(cell, replaced);
        }
    }

    let stats: Vec<String> = content.stats.iter().map(|s| format!("{}<br>\n", s)).collect();
    let insert_at = match last_cell_containing(cells, ph::QUICK_STATS) {
        Some(i) => {
            let mut lines = source_lines(&cells[i]);
            let pos = lines
                .iter()
                .rposition(|l| l.contains(ph::QUICK_STATS))
                .unwrap_or(lines.len().saturating_sub(1));
            if let Some(line) = lines.get_mut(pos) {
                if !line.ends_with('\n') {
                    line.push('\n');
                }
            }
            lines.splice(pos + 1..pos + 1, stats);
            set_source(&mut cells[i], lines);
            i + 1
        }
        None => {
            log::warn!("notebook template has no '{}' cell, adding one", ph::QUICK_STATS);
            let mut lines = vec![format!("### {}\n", ph::QUICK_STATS)];
            lines.extend(stats);
            cells.insert(0, markdown_cell(lines));
            1
        }
    };

    let title = format!("**Common Filename:** `{}`", content.common_name);
    let header = match &content.snapshot {
        Some(snapshot) => vec![format!("{}\n", title), format!("![]({})", snapshot)],
        None => vec![title],
    };
    let mut new_cells = vec![markdown_cell(header)];
    if !content.quicklooks.is_empty() {
        let images = content
            .quicklooks
            .iter()
            .map(|p| format!("![]({})\n", p))
            .collect();
        new_cells.push(markdown_cell(images));
    }
    cells.splice(insert_at..insert_at, new_cells);

    if !content.bundles.is_empty() {
        if let Some(i) = last_cell_containing(cells, ph::LOAD_BUNDLE) {
            let lines: Vec<String> = source_lines(&cells[i])
                .into_iter()
                .flat_map(|l| {
                    if l.contains(ph::LOAD_BUNDLE) {
                        content
                            .bundles
                            .iter()
                            .map(|b| format!("#loadBundle('{}')\n", b))
                            .collect::<Vec<_>>()
                    } else {
                        vec![l]
                    }
                })
                .collect();
            set_source(&mut cells[i], lines);
        }
    }
    Ok(())
}

/// Parse a template, fill it and return the notebook text
pub fn render(template: &str, content: &NotebookContent) -> Result<String> {
    let mut notebook: Value = serde_json::from_str(template)?;
    fill(&mut notebook, content)?;
    Ok(serde_json::to_string_pretty(&notebook)?)
}

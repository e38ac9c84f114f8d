use crate::about::{apply_mapping, About, Validation};
use crate::domain::constants::{TEMPLATE_COMPONENTS, TEMPLATE_TOOL_VERSION};
use crate::domain::models::Issue;
use crate::services::inventory::filter_by_inventory;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>Open Source Software Information</title>
<style>
body { font-family: sans-serif; margin: 2em; }
pre { background: #f6f6f6; padding: 1em; white-space: pre-wrap; }
.component { border-top: 1px solid #ccc; margin-top: 2em; }
</style>
</head>
<body>
<h1>Open Source Software Information</h1>
{{ components }}
<footer><p>Generated with about-code-tool version {{ tool_version }}</p></footer>
</body>
</html>
"#;

#[derive(Default)]
pub struct AttribOptions<'a> {
    pub template: Option<&'a Path>,
    /// CSV/JSON listing the `about_file_path`s to attribute.
    pub inventory_location: Option<&'a Path>,
    pub mapping: Option<&'a BTreeMap<String, String>>,
}

pub fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn remap(about: &About, mapping: &BTreeMap<String, String>) -> About {
    let fields: Vec<(String, String)> = about
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    About::from_fields(
        &about.about_file_path,
        &about.base_dir,
        apply_mapping(fields, mapping),
        Validation { check_paths: false },
    )
    .0
}

fn texts(about: &About, field: &str) -> Vec<(String, String)> {
    about
        .lines(field)
        .into_iter()
        .filter_map(|file| about.read_text(file).map(|t| (file.to_string(), t)))
        .collect()
}

/// HTML fragment for the component list: a table of contents, then one
/// section per component.
pub fn render_components(abouts: &[About]) -> String {
    let mut out = String::new();
    out.push_str("<ul class=\"toc\">\n");
    for (i, about) in abouts.iter().enumerate() {
        let _ = writeln!(
            out,
            "<li><a href=\"#component-{}\">{}</a></li>",
            i,
            html_escape(&title(about))
        );
    }
    out.push_str("</ul>\n");

    for (i, about) in abouts.iter().enumerate() {
        let _ = writeln!(out, "<div class=\"component\" id=\"component-{}\">", i);
        let _ = writeln!(out, "<h3>{}</h3>", html_escape(&title(about)));
        if let Some(url) = about.get("homepage_url") {
            let _ = writeln!(out, "<p><a href=\"{0}\">{0}</a></p>", html_escape(url));
        }
        if let Some(copyright) = about.get("copyright") {
            let _ = writeln!(out, "<pre class=\"copyright\">{}</pre>", html_escape(copyright));
        }
        if let Some(expression) = about.get("license_expression") {
            let _ = writeln!(out, "<p>License: {}</p>", html_escape(expression));
        }
        for (file, text) in texts(about, "license_file") {
            let _ = writeln!(
                out,
                "<h4>{}</h4>\n<pre class=\"license\">{}</pre>",
                html_escape(&file),
                html_escape(&text)
            );
        }
        for (_, text) in texts(about, "notice_file") {
            let _ = writeln!(out, "<pre class=\"notice\">{}</pre>", html_escape(&text));
        }
        out.push_str("</div>\n");
    }
    out
}

fn title(about: &About) -> String {
    match about.get("version") {
        Some(v) => format!("{} {}", about.name(), v),
        None => about.name().to_string(),
    }
}

/// Render the attribution document for `abouts` and write it to `output`.
pub fn generate_and_save(
    abouts: &[About],
    output: &Path,
    opts: &AttribOptions<'_>,
) -> anyhow::Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let mut selected = match opts.inventory_location {
        Some(inventory) => {
            let (kept, missing) = filter_by_inventory(abouts, inventory);
            issues.extend(missing);
            kept
        }
        None => abouts.to_vec(),
    };
    if let Some(mapping) = opts.mapping {
        selected = selected.iter().map(|a| remap(a, mapping)).collect();
    }

    let template = match opts.template {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    if !template.contains(TEMPLATE_COMPONENTS) {
        let shown = opts
            .template
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        issues.push(Issue::error(format!(
            "Template {} has no {} placeholder. Attribution generation skipped.",
            shown, TEMPLATE_COMPONENTS
        )));
        return Ok(issues);
    }

    let rendered = template
        .replace(TEMPLATE_COMPONENTS, &render_components(&selected))
        .replace(TEMPLATE_TOOL_VERSION, env!("CARGO_PKG_VERSION"));
    std::fs::write(output, rendered)?;
    tracing::info!(output = %output.display(), components = selected.len(), "attribution written");
    Ok(issues)
}

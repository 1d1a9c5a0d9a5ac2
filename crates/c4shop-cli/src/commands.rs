use std::path::{Path, PathBuf};

use anyhow::Context;

use c4shop_core::{storage, ExportFormat, ExportSettings, Model, View, Workspace};
use c4shop_model::build_workspace;

fn assemble() -> anyhow::Result<Workspace> {
    build_workspace().context("assembling the WebShop workspace")
}

pub fn export(
    settings: &ExportSettings,
    out: Option<PathBuf>,
    formats: Vec<ExportFormat>,
    name: &str,
    compact: bool,
) -> anyhow::Result<()> {
    let workspace = assemble()?;
    let dir = out.unwrap_or_else(|| settings.output_dir());
    let formats = resolve_formats(formats, settings)?;
    let pretty = settings.pretty && !compact;

    for format in formats {
        let path = storage::export(&dir, name, &workspace, format, pretty)
            .with_context(|| format!("writing {} export to {}", format, dir.display()))?;
        println!("{}", path.display());
    }
    Ok(())
}

/// Flags win over settings. Repeats are dropped, first occurrence kept.
fn resolve_formats(
    requested: Vec<ExportFormat>,
    settings: &ExportSettings,
) -> anyhow::Result<Vec<ExportFormat>> {
    let candidates = if requested.is_empty() {
        settings.formats.clone()
    } else {
        requested
    };
    let mut formats = Vec::with_capacity(candidates.len());
    for format in candidates {
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    if formats.is_empty() {
        anyhow::bail!("no export formats configured");
    }
    Ok(formats)
}

pub fn summary() -> anyhow::Result<()> {
    let workspace = assemble()?;
    print!("{}", render_summary(&workspace));
    Ok(())
}

pub fn schema() -> anyhow::Result<()> {
    let schema = c4shop_core::workspace_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

pub fn validate(file: &Path) -> anyhow::Result<()> {
    let workspace = storage::read_workspace(file)
        .with_context(|| format!("validating {}", file.display()))?;
    println!(
        "{}: ok ({} elements, {} relationships, {} views)",
        file.display(),
        workspace.model.elements().count(),
        workspace.model.relationships().count(),
        workspace.views.views().count()
    );
    Ok(())
}

fn render_summary(workspace: &Workspace) -> String {
    let model = &workspace.model;
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", workspace.name, workspace.description));
    out.push_str(&format!(
        "  persons {}, software systems {}, containers {}, relationships {}\n",
        model.people().count(),
        model.software_systems().count(),
        model.containers().count(),
        model.relationships().count()
    ));
    for view in workspace.views.views() {
        render_view(&mut out, model, view);
    }
    out
}

fn render_view(out: &mut String, model: &Model, view: &View) {
    out.push_str(&format!("view {} ({:?}", view.key, view.kind));
    if let Some(paper) = view.paper_size {
        out.push_str(", ");
        out.push_str(paper.as_str());
    }
    out.push_str(")\n");

    let names: Vec<&str> = view
        .elements()
        .iter()
        .filter_map(|id| model.element(*id))
        .map(|e| e.name.as_str())
        .collect();
    out.push_str(&format!("  elements: {}\n", names.join(", ")));

    for rel in view.relationships().iter().filter_map(|id| model.relationship(*id)) {
        out.push_str(&format!(
            "  {} -> {}: {}\n",
            name_of(model, rel.source_id),
            name_of(model, rel.destination_id),
            rel.description
        ));
    }
    for rel in view.implied_relationships(model) {
        out.push_str(&format!(
            "  {} -> {}: {} (implied)\n",
            name_of(model, rel.source_id),
            name_of(model, rel.destination_id),
            rel.description
        ));
    }
}

fn name_of(model: &Model, id: c4shop_core::ElementId) -> &str {
    model
        .element(id)
        .map(|e| e.name.as_str())
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_both_views() {
        let workspace = build_workspace().unwrap();
        let text = render_summary(&workspace);
        assert!(text.contains("persons 2, software systems 3, containers 3, relationships 7"));
        assert!(text.contains("view SystemContext (SystemContext, A4_Landscape)"));
        assert!(text.contains("view Containers (Container, A4_Landscape)"));
        assert!(text.contains("Customer -> WebShop: Navega, busca e compra produtos (implied)"));
        assert!(text.contains(
            "Payment Gateway -> API Backend: Envia callback de status do pagamento\n"
        ));
    }

    #[test]
    fn repeated_formats_keep_first_occurrence() {
        let settings = ExportSettings::default();
        let formats = resolve_formats(
            vec![ExportFormat::Json, ExportFormat::Dsl, ExportFormat::Json],
            &settings,
        )
        .unwrap();
        assert_eq!(formats, vec![ExportFormat::Json, ExportFormat::Dsl]);
    }

    #[test]
    fn settings_formats_apply_without_flags() {
        let settings = ExportSettings {
            formats: vec![ExportFormat::Dsl, ExportFormat::Dsl],
            ..ExportSettings::default()
        };
        assert_eq!(
            resolve_formats(vec![], &settings).unwrap(),
            vec![ExportFormat::Dsl]
        );
    }

    #[test]
    fn empty_format_list_is_an_error() {
        let settings = ExportSettings {
            formats: vec![],
            ..ExportSettings::default()
        };
        let err = resolve_formats(vec![], &settings).unwrap_err();
        assert_eq!(err.to_string(), "no export formats configured");
    }
}

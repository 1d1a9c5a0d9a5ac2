//! Structurizr DSL rendering of a workspace, for external diagram tools.

use crate::model::{Element, ElementId, ElementKind, Model};
use crate::tags;
use crate::views::ViewKind;
use crate::Workspace;

const INDENT: &str = "    ";

/// Stable DSL identifier for an element, e.g. `p1`, `s3`, `c6`.
pub fn identifier(element: &Element) -> String {
    let prefix = match element.kind {
        ElementKind::Person => 'p',
        ElementKind::SoftwareSystem => 's',
        ElementKind::Container => 'c',
    };
    format!("{}{}", prefix, element.id)
}

pub fn to_dsl(workspace: &Workspace) -> String {
    let mut out = String::with_capacity(4096);
    let model = &workspace.model;

    out.push_str("workspace ");
    push_quoted(&mut out, &workspace.name);
    out.push(' ');
    push_quoted(&mut out, &workspace.description);
    out.push_str(" {\n\n");

    out.push_str(INDENT);
    out.push_str("model {\n");
    for element in model.elements().filter(|e| e.parent_id.is_none()) {
        push_element(&mut out, model, element, 2);
    }
    if model.relationships().next().is_some() {
        out.push('\n');
    }
    for rel in model.relationships() {
        let (Some(source), Some(destination)) = (
            model.element(rel.source_id),
            model.element(rel.destination_id),
        ) else {
            continue;
        };
        indent(&mut out, 2);
        out.push_str(&identifier(source));
        out.push_str(" -> ");
        out.push_str(&identifier(destination));
        out.push(' ');
        push_quoted(&mut out, &rel.description);
        if let Some(tech) = &rel.technology {
            out.push(' ');
            push_quoted(&mut out, tech);
        }
        out.push('\n');
    }
    out.push_str(INDENT);
    out.push_str("}\n\n");

    out.push_str(INDENT);
    out.push_str("views {\n");
    for view in workspace.views.views() {
        let Some(system) = model.element(view.software_system_id) else {
            continue;
        };
        indent(&mut out, 2);
        out.push_str(match view.kind {
            ViewKind::SystemContext => "systemContext ",
            ViewKind::Container => "container ",
        });
        out.push_str(&identifier(system));
        out.push(' ');
        push_quoted(&mut out, &view.key);
        out.push(' ');
        push_quoted(&mut out, &view.description);
        out.push_str(" {\n");

        indent(&mut out, 3);
        out.push_str("include");
        for id in view.elements() {
            if let Some(element) = model.element(*id) {
                out.push(' ');
                out.push_str(&identifier(element));
            }
        }
        out.push('\n');
        if let Some(paper) = view.paper_size {
            indent(&mut out, 3);
            out.push_str("properties {\n");
            indent(&mut out, 4);
            out.push_str("\"paperSize\" ");
            push_quoted(&mut out, paper.as_str());
            out.push('\n');
            indent(&mut out, 3);
            out.push_str("}\n");
        }
        indent(&mut out, 3);
        out.push_str("autoLayout\n");
        indent(&mut out, 2);
        out.push_str("}\n\n");
    }
    push_styles(&mut out, workspace);
    out.push_str(INDENT);
    out.push_str("}\n}\n");
    out
}

fn push_element(out: &mut String, model: &Model, element: &Element, depth: usize) {
    indent(out, depth);
    out.push_str(&identifier(element));
    out.push_str(match element.kind {
        ElementKind::Person => " = person ",
        ElementKind::SoftwareSystem => " = softwareSystem ",
        ElementKind::Container => " = container ",
    });
    push_quoted(out, &element.name);
    out.push(' ');
    push_quoted(out, &element.description);
    if element.kind == ElementKind::Container {
        if let Some(tech) = &element.technology {
            out.push(' ');
            push_quoted(out, tech);
        }
    }
    out.push_str(" {\n");

    // Default tags are implied by the element keyword.
    let extra: Vec<&str> = element
        .tags
        .iter()
        .filter(|t| *t != tags::ELEMENT && *t != element.kind.default_tag())
        .collect();
    if !extra.is_empty() {
        indent(out, depth + 1);
        out.push_str("tags");
        for tag in extra {
            out.push(' ');
            push_quoted(out, tag);
        }
        out.push('\n');
    }
    if let Some(location) = element.location {
        indent(out, depth + 1);
        out.push_str("properties {\n");
        indent(out, depth + 2);
        out.push_str("\"location\" ");
        push_quoted(out, &format!("{:?}", location));
        out.push('\n');
        indent(out, depth + 1);
        out.push_str("}\n");
    }

    let children: Vec<ElementId> = model
        .elements()
        .filter(|e| e.parent_id == Some(element.id))
        .map(|e| e.id)
        .collect();
    for child in children {
        if let Some(child) = model.element(child) {
            push_element(out, model, child, depth + 1);
        }
    }

    indent(out, depth);
    out.push_str("}\n");
}

fn push_styles(out: &mut String, workspace: &Workspace) {
    let styles = workspace.views.styles();
    if styles.element_styles().is_empty() && styles.relationship_styles().is_empty() {
        return;
    }
    indent(out, 2);
    out.push_str("styles {\n");
    for style in styles.element_styles() {
        indent(out, 3);
        out.push_str("element ");
        push_quoted(out, &style.tag);
        out.push_str(" {\n");
        if let Some(background) = &style.background {
            push_property(out, "background", background);
        }
        if let Some(color) = &style.color {
            push_property(out, "color", color);
        }
        if let Some(shape) = style.shape {
            push_property(out, "shape", &shape.to_string());
        }
        if let Some(size) = style.font_size {
            push_property(out, "fontSize", &size.to_string());
        }
        indent(out, 3);
        out.push_str("}\n");
    }
    for style in styles.relationship_styles() {
        indent(out, 3);
        out.push_str("relationship ");
        push_quoted(out, &style.tag);
        out.push_str(" {\n");
        if let Some(thickness) = style.thickness {
            push_property(out, "thickness", &thickness.to_string());
        }
        if let Some(color) = &style.color {
            push_property(out, "color", color);
        }
        if let Some(size) = style.font_size {
            push_property(out, "fontSize", &size.to_string());
        }
        if let Some(dashed) = style.dashed {
            push_property(out, "dashed", &dashed.to_string());
        }
        indent(out, 3);
        out.push_str("}\n");
    }
    indent(out, 2);
    out.push_str("}\n");
}

fn push_property(out: &mut String, name: &str, value: &str) {
    indent(out, 4);
    out.push_str(name);
    out.push(' ');
    out.push_str(value);
    out.push('\n');
}

fn push_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

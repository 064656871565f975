//! Reading uncompressed draw.io diagrams.
//!
//! The cells live under `mxfile/diagram/mxGraphModel/root`. A bare
//! `mxGraphModel` document is accepted as well. Cells that carry custom
//! properties are wrapped in an `object` (or `UserObject`) element holding the
//! id and label; the inner `mxCell` holds the rest.

use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{SceneError, SceneResult};
use crate::layout::{Cell, Layout};

/// Parse the text of a `.drawio` file.
pub fn parse(path: &Path, text: &str) -> SceneResult<Layout> {
    let fail = |message: String| SceneError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let doc = Document::parse(text).map_err(|err| fail(err.to_string()))?;
    let model = doc
        .descendants()
        .find(|node| node.has_tag_name("mxGraphModel"))
        .ok_or_else(|| {
            fail("no mxGraphModel element; save the diagram uncompressed".to_string())
        })?;

    let width = extent(&model, &["dx", "pageWidth"]).map_err(&fail)?;
    let height = extent(&model, &["dy", "pageHeight"]).map_err(&fail)?;

    let root = model
        .children()
        .find(|node| node.has_tag_name("root"))
        .ok_or_else(|| fail("mxGraphModel has no root element".to_string()))?;

    let cells = root
        .children()
        .filter(Node::is_element)
        .map(cell)
        .collect::<Result<Vec<_>, _>>()
        .map_err(fail)?;

    Ok(Layout {
        width,
        height,
        cells,
    })
}

fn extent(model: &Node<'_, '_>, names: &[&str]) -> Result<f64, String> {
    for name in names {
        if let Some(value) = model.attribute(*name) {
            return number(name, value);
        }
    }
    Err(format!("mxGraphModel has none of {names:?}"))
}

fn number(name: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("attribute {name}=\"{value}\" is not a number"))
}

fn optional(node: &Node<'_, '_>, name: &str) -> Result<Option<f64>, String> {
    node.attribute(name).map(|v| number(name, v)).transpose()
}

fn owned(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn cell(node: Node<'_, '_>) -> Result<Cell, String> {
    // `object` wrappers carry id and label; the geometry sits in the inner mxCell.
    let (outer, inner) = if node.has_tag_name("mxCell") {
        (node, node)
    } else {
        let inner = node
            .children()
            .find(|child| child.has_tag_name("mxCell"))
            .ok_or_else(|| format!("<{}> has no mxCell", node.tag_name().name()))?;
        (node, inner)
    };

    let id = outer
        .attribute("id")
        .ok_or_else(|| "cell without an id".to_string())?
        .to_string();
    let value = owned(&outer, "value").or_else(|| owned(&outer, "label"));

    let mut cell = Cell {
        id,
        value,
        edge: inner.has_attribute("edge"),
        source: owned(&inner, "source"),
        target: owned(&inner, "target"),
        style: owned(&inner, "style"),
        parent: owned(&inner, "parent"),
        ..Cell::default()
    };

    if let Some(geometry) = inner.children().find(|c| c.has_tag_name("mxGeometry")) {
        cell.x = Some(optional(&geometry, "x")?.unwrap_or(0.0));
        cell.y = Some(optional(&geometry, "y")?.unwrap_or(0.0));
        cell.width = optional(&geometry, "width")?;
        cell.height = optional(&geometry, "height")?;
    }
    Ok(cell)
}

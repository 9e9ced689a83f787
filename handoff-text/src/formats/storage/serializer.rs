//! Storage markup serialization (Document → markup)
//!
//! Pipeline: Document → Events → RcDom → markup string.
//! Escaping of `&`, `<`, `>` and the non-breaking space is left to the html5ever
//! serializer.

use crate::common::lines_to_events::document_to_events;
use crate::error::FormatError;
use crate::ir::events::{Event, Run};
use crate::model::{CharTags, Document, ListKind};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, LocalName, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Separator written between top-level blocks.
pub const BLOCK_SEPARATOR: &str = "\n";

/// Serialize a document to storage markup
pub fn serialize_to_storage(doc: &Document) -> Result<String, FormatError> {
    let events = document_to_events(doc);
    log::debug!(
        "serializing {} lines as {} events",
        doc.line_count(),
        events.len()
    );
    let dom = build_dom(&events)?;
    serialize_dom(&dom)
}

/// Build a DOM tree from IR events
fn build_dom(events: &[Event]) -> Result<RcDom, FormatError> {
    let dom = RcDom::default();
    let container = create_element("div");

    let mut current_parent: Handle = container.clone();
    let mut parent_stack: Vec<Handle> = vec![];

    for event in events {
        match event {
            Event::StartDocument | Event::EndDocument => {}

            Event::StartParagraph => open(&mut current_parent, &mut parent_stack, "p"),

            Event::StartHeading(level) => {
                let tag = format!("h{}", level.level());
                open(&mut current_parent, &mut parent_stack, &tag);
            }

            Event::StartList(kind) => {
                let tag = match kind {
                    ListKind::Bullet => "ul",
                    ListKind::Numbered => "ol",
                };
                open(&mut current_parent, &mut parent_stack, tag);
            }

            Event::StartListItem => open(&mut current_parent, &mut parent_stack, "li"),

            Event::EndParagraph
            | Event::EndHeading(_)
            | Event::EndList(_)
            | Event::EndListItem => {
                current_parent = parent_stack.pop().ok_or_else(|| {
                    FormatError::SerializationError(format!("Unbalanced {event:?}"))
                })?;
            }

            Event::Inline(run) => add_run(&current_parent, run),
        }
    }

    if !parent_stack.is_empty() {
        return Err(FormatError::SerializationError(
            "Unclosed block at end of document".to_string(),
        ));
    }

    dom.document.children.borrow_mut().push(container);
    Ok(dom)
}

fn open(current_parent: &mut Handle, parent_stack: &mut Vec<Handle>, tag: &str) {
    let element = create_element(tag);
    current_parent.children.borrow_mut().push(element.clone());
    parent_stack.push(current_parent.clone());
    *current_parent = element;
}

/// Nest `<strong>`, `<em>`, `<u>` (outermost first) around the run's text.
fn add_run(parent: &Handle, run: &Run) {
    let mut target = parent.clone();
    for (flag, tag) in [
        (CharTags::BOLD, "strong"),
        (CharTags::ITALIC, "em"),
        (CharTags::UNDERLINE, "u"),
    ] {
        if run.tags.contains(flag) {
            let wrapper = create_element(tag);
            target.children.borrow_mut().push(wrapper.clone());
            target = wrapper;
        }
    }
    target.children.borrow_mut().push(create_text(&run.text));
}

/// Create an attribute-less element
fn create_element(tag: &str) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(Vec::new()),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize every top-level block, joined by [`BLOCK_SEPARATOR`]
fn serialize_dom(dom: &RcDom) -> Result<String, FormatError> {
    let container = dom
        .document
        .children
        .borrow()
        .first()
        .ok_or_else(|| FormatError::SerializationError("Empty document".to_string()))?
        .clone();

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut blocks = Vec::new();
    for child in container.children.borrow().iter() {
        let mut output = Vec::new();
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("Markup serialization failed: {e}"))
        })?;
        blocks.push(String::from_utf8(output).map_err(|e| {
            FormatError::SerializationError(format!("UTF-8 conversion failed: {e}"))
        })?);
    }

    Ok(blocks.join(BLOCK_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FormatTag, Range};

    #[test]
    fn test_simple_paragraph() {
        let doc = Document::from_text("This is a simple paragraph.");
        let markup = serialize_to_storage(&doc).unwrap();
        assert_eq!(markup, "<p>This is a simple paragraph.</p>");
    }

    #[test]
    fn test_nesting_order_is_fixed() {
        let mut doc = Document::from_text("all");
        let range = Range::on_line(1, 0, 3);
        doc.toggle(FormatTag::Underline, range).unwrap();
        doc.toggle(FormatTag::Italic, range).unwrap();
        doc.toggle(FormatTag::Bold, range).unwrap();

        let markup = serialize_to_storage(&doc).unwrap();
        assert_eq!(markup, "<p><strong><em><u>all</u></em></strong></p>");
    }

    #[test]
    fn test_unbalanced_events_are_rejected() {
        let result = build_dom(&[Event::StartParagraph]);
        assert!(matches!(result, Err(FormatError::SerializationError(_))));

        let result = build_dom(&[Event::EndParagraph]);
        assert!(matches!(result, Err(FormatError::SerializationError(_))));
    }
}

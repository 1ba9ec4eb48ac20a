use std::collections::BTreeMap;

use lopdf::{content::Operation, Document, Object, ObjectId};

use super::ExtractorError;

pub const PAGE_SEPARATOR: &str = "\n\n";

/// TJ displacements below this (thousandths of an em) are treated as word gaps.
const WORD_GAP: i64 = -100;

/// Pulls the text of every page in page order. Each text-showing operator is one
/// item; items on a page are joined with single spaces and pages are separated by
/// a blank line.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractorError> {
    let document = Document::load_mem(bytes).map_err(|e| ExtractorError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    // get_pages is keyed by 1-based page number, so iteration is in page order.
    for (page_number, page_id) in document.get_pages() {
        let items = page_items(&document, page_id)
            .map_err(|e| ExtractorError::Pdf(format!("page {}: {}", page_number, e)))?;
        pages.push(items.join(" "));
    }

    Ok(pages.join(PAGE_SEPARATOR))
}

fn page_items(document: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings: BTreeMap<Vec<u8>, &str> = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();
    let content = document.get_and_decode_page_content(page_id)?;

    let mut items = Vec::new();
    let mut encoding = None;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|font| encodings.get(font).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => {
                let item = shown_text(operation, encoding);
                let item = item.trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
            }
            _ => {}
        }
    }
    Ok(items)
}

fn shown_text(operation: &Operation, encoding: Option<&str>) -> String {
    let mut text = String::new();
    for operand in &operation.operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)),
            Object::Array(parts) => {
                for part in parts {
                    match part {
                        Object::String(bytes, _) => {
                            text.push_str(&Document::decode_text(encoding, bytes))
                        }
                        Object::Integer(gap) if *gap < WORD_GAP => text.push(' '),
                        Object::Real(gap) if *gap < WORD_GAP as f32 => text.push(' '),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;
    use lopdf::{dictionary, Stream};

    fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for items in pages {
            let mut operations = Vec::new();
            for (row, item) in items.iter().enumerate() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new(
                    "Td",
                    vec![72.into(), (700 - 20 * row as i64).into()],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*item)]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("content should encode"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("pdf should save");
        bytes
    }

    #[test]
    fn three_pages_keep_order_and_blank_line_separators() {
        let bytes = build_pdf(&[
            &["Alpha one", "Alpha two"],
            &["Beta one", "Beta two"],
            &["Gamma one", "Gamma two"],
        ]);

        let text = extract_text(&bytes).expect("pdf should extract");

        assert_eq!(
            text,
            "Alpha one Alpha two\n\nBeta one Beta two\n\nGamma one Gamma two"
        );
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(matches!(
            extract_text(b"definitely not a pdf"),
            Err(ExtractorError::Pdf(_))
        ));
    }

    fn single_page_pdf(operations: Vec<Operation>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            Content { operations }.encode().expect("content should encode"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("pdf should save");
        bytes
    }

    #[test]
    fn items_on_one_line_are_space_separated() {
        let bytes = single_page_pdf(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("Td", vec![40.into(), 0.into()]),
            Operation::new("Tj", vec![Object::string_literal("World")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(extract_text(&bytes).expect("pdf should extract"), "Hello World");
    }

    #[test]
    fn kerned_array_is_one_item_with_word_gaps() {
        let bytes = single_page_pdf(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Ce"),
                    Object::Integer(-20),
                    Object::string_literal("lls"),
                    Object::Integer(-250),
                    Object::string_literal("divide"),
                ])],
            ),
            Operation::new("Tj", vec![Object::string_literal("  ")]),
            Operation::new("'", vec![Object::string_literal("by mitosis")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(
            extract_text(&bytes).expect("pdf should extract"),
            "Cells divide by mitosis"
        );
    }
}

//! Document walker: locates feed items and reads their attribute values.

use roxmltree::{Document, Node};

use crate::catalog::Field;

/// Namespace URI of the Google Shopping product attributes (`g:` prefix).
pub const GOOGLE_NS: &str = "http://base.google.com/ns/1.0";

/// Local name of an item element.
pub const ITEM_TAG: &str = "item";

/// One product entry extracted from a feed.
///
/// Holds the normalized value of every catalog field. A value is `None` when
/// the element is missing, empty, or contains only whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    index: usize,
    values: [Option<String>; Field::REQUIRED.len()],
}

impl Item {
    /// Create an item at the given 1-based document position with no values.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            values: std::array::from_fn(|_| None),
        }
    }

    /// Set a field value, applying the same normalization as the walker.
    #[must_use]
    pub fn with(mut self, field: Field, value: &str) -> Self {
        self.values[field.slot()] = normalize(Some(value)).map(str::to_owned);
        self
    }

    /// 1-based position of the item in document order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Normalized value of `field`, or `None` when absent.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values[field.slot()].as_deref()
    }

    fn from_node(index: usize, node: Node<'_, '_>) -> Self {
        let mut item = Self::new(index);
        for field in Field::REQUIRED {
            item.values[field.slot()] = get_field(node, field.as_str());
        }
        item
    }
}

/// Extract every `item` element in the document, at any depth, in document order.
///
/// Only un-namespaced `item` elements are considered; the product attributes
/// themselves live in [`GOOGLE_NS`]. The root element is never an item, even
/// when it is named `item`.
#[must_use]
pub fn extract_items(document: &Document<'_>) -> Vec<Item> {
    document
        .root_element()
        .descendants()
        .skip(1)
        .filter(|node| is_item(*node))
        .enumerate()
        .map(|(position, node)| Item::from_node(position + 1, node))
        .collect()
}

/// Read the trimmed text of the first `g:<name>` child of `item`.
///
/// The text is everything before the element's first child element, with
/// comments and processing instructions dropped and the pieces around them
/// joined. Returns `None` if the element is missing, has no text, or its text
/// is whitespace-only.
#[must_use]
pub fn get_field(item: Node<'_, '_>, name: &str) -> Option<String> {
    let element = item.children().find(|child| {
        child.is_element()
            && child.tag_name().name() == name
            && child.tag_name().namespace() == Some(GOOGLE_NS)
    })?;
    let text: String = element
        .children()
        .take_while(|child| !child.is_element())
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect();
    normalize(Some(text.as_str())).map(str::to_owned)
}

fn is_item(node: Node<'_, '_>) -> bool {
    node.is_element() && node.tag_name().name() == ITEM_TAG && node.tag_name().namespace().is_none()
}

fn normalize(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Document<'_> {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn test_extracts_nested_items_in_order() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0"><channel>
            <item><g:id>A</g:id></item>
            <group><item><g:id>B</g:id></item></group>
            <item><g:id>C</g:id></item>
        </channel></rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        let ids: Vec<_> = items.iter().map(|i| i.get(Field::Id)).collect();
        assert_eq!(ids, vec![Some("A"), Some("B"), Some("C")]);
        let indices: Vec<_> = items.iter().map(Item::index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_whitespace_only_is_absent() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0"><channel><item>
            <g:title>   </g:title>
            <g:description></g:description>
            <g:link>
                https://shop.example/p/1
            </g:link>
        </item></channel></rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get(Field::Title), None);
        assert_eq!(items[0].get(Field::Description), None);
        assert_eq!(items[0].get(Field::Link), Some("https://shop.example/p/1"));
    }

    #[test]
    fn test_field_requires_google_namespace() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0" xmlns:x="urn:other">
            <item><title>plain</title><x:price>1.00 PLN</x:price><g:price>2.00 PLN</g:price></item>
        </rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        assert_eq!(items[0].get(Field::Title), None);
        assert_eq!(items[0].get(Field::Price), Some("2.00 PLN"));
    }

    #[test]
    fn test_first_matching_child_wins() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0">
            <item><g:id> </g:id><g:id>second</g:id></item>
        </rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        assert_eq!(items[0].get(Field::Id), None);
    }

    #[test]
    fn test_get_field_ignores_grandchildren() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0">
            <item><wrapper><g:id>deep</g:id></wrapper></item>
        </rss>"#;
        let doc = parse(xml);
        let item = doc.descendants().find(|n| is_item(*n)).unwrap();

        assert_eq!(get_field(item, "id"), None);
    }

    #[test]
    fn test_comments_inside_value_are_skipped() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0"><item>
            <g:price><!-- net -->9.99 PLN</g:price>
            <g:title>Blue<!--x--> mug</g:title>
            <g:description>Mug <?render bold?>set<b>ignored</b> tail</g:description>
        </item></rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        assert_eq!(items[0].get(Field::Price), Some("9.99 PLN"));
        assert_eq!(items[0].get(Field::Title), Some("Blue mug"));
        assert_eq!(items[0].get(Field::Description), Some("Mug set"));
    }

    #[test]
    fn test_comment_only_value_is_absent() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0">
            <item><g:id> <!-- todo --> </g:id></item>
        </rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        assert_eq!(items[0].get(Field::Id), None);
    }

    #[test]
    fn test_root_item_is_not_counted() {
        let xml = r#"<item xmlns:g="http://base.google.com/ns/1.0"><g:id>1</g:id></item>"#;
        let doc = parse(xml);

        assert!(extract_items(&doc).is_empty());
    }

    #[test]
    fn test_item_has_a_slot_per_catalog_field() {
        let mut item = Item::new(1);
        for field in Field::REQUIRED {
            item = item.with(field, "x");
        }

        assert!(Field::REQUIRED.iter().all(|f| item.get(*f) == Some("x")));
        assert_eq!(item.values.len(), Field::REQUIRED.len());
    }

    #[test]
    fn test_cdata_text_is_read() {
        let xml = r#"<rss xmlns:g="http://base.google.com/ns/1.0">
            <item><g:description><![CDATA[ Soft <b>cotton</b> ]]></g:description></item>
        </rss>"#;
        let doc = parse(xml);
        let items = extract_items(&doc);

        assert_eq!(items[0].get(Field::Description), Some("Soft <b>cotton</b>"));
    }

    #[test]
    fn test_namespaced_item_is_not_an_item() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><item/></feed>"#;
        let doc = parse(xml);

        assert!(extract_items(&doc).is_empty());
    }

    #[test]
    fn test_builder_normalizes_values() {
        let item = Item::new(4)
            .with(Field::Title, "  Shoe ")
            .with(Field::Description, "\t\n");

        assert_eq!(item.index(), 4);
        assert_eq!(item.get(Field::Title), Some("Shoe"));
        assert_eq!(item.get(Field::Description), None);
        assert_eq!(item.get(Field::Price), None);
    }
}

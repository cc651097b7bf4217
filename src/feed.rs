use chrono::{DateTime, FixedOffset};

use crate::post::{wrap_content, Post};
use crate::xml::{self, Element};
use crate::{Error, Result};

/// The syndication formats a document can be mapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    /// RSS 2.0, `<rss><channel><item>`
    Rss,
    /// RSS 1.0, `<rdf:RDF><item>`
    Rdf,
    /// Atom, `<feed><entry>`
    Atom,
}

impl FeedFormat {
    pub fn detect(root: &Element) -> Result<Self> {
        if root.is(None, "rss") {
            Ok(Self::Rss)
        } else if root.is(Some(xml::RDF), "RDF") {
            Ok(Self::Rdf)
        } else if root.is(Some(xml::ATOM), "feed") {
            Ok(Self::Atom)
        } else {
            log::warn!("unrecognized feed root element `{}`", root.name);
            Err(Error::UnrecognizedFormat(root.name.to_string()))
        }
    }

    /// Every item or entry of the document, in document order
    pub fn items<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        match self {
            Self::Rss => root
                .child(None, "channel")
                .map(|channel| channel.children_named(None, "item").collect())
                .unwrap_or_default(),
            Self::Rdf => root.children_named(Some(xml::RSS_1), "item").collect(),
            Self::Atom => root.children_named(Some(xml::ATOM), "entry").collect(),
        }
    }

    pub fn to_post(&self, item: &Element) -> Post {
        let (title, description, publish_date) = match self {
            Self::Rss => (
                item.text_of(None, "title"),
                item.text_of(None, "description"),
                item.text_of(None, "pubDate")
                    .and_then(parse_rfc2822)
                    .or_else(|| dc_date(item)),
            ),
            Self::Rdf => (
                item.text_of(Some(xml::RSS_1), "title"),
                item.text_of(Some(xml::RSS_1), "description"),
                dc_date(item),
            ),
            Self::Atom => (
                atom_text(item, "title"),
                atom_text(item, "summary"),
                item.text_of(Some(xml::ATOM), "published")
                    .and_then(parse_rfc3339)
                    .or_else(|| {
                        item.text_of(Some(xml::ATOM), "updated")
                            .and_then(parse_rfc3339)
                    }),
            ),
        };
        Post {
            publish_date,
            author: item
                .text_of(Some(xml::DUBLIN_CORE), "creator")
                .unwrap_or_default()
                .trim()
                .to_string(),
            title: title.unwrap_or_default().trim().to_string(),
            description: description.unwrap_or_default().to_string(),
            content: item
                .text_of(Some(xml::CONTENT), "encoded")
                .map(wrap_content)
                .unwrap_or_default(),
        }
    }
}

/// Parse a syndication document and map each of its entries to a [`Post`]
pub fn parse_posts(bytes: &[u8]) -> Result<Vec<Post>> {
    let root = Element::parse(bytes)?;
    let format = FeedFormat::detect(&root)?;
    let posts: Vec<Post> = format
        .items(&root)
        .into_iter()
        .map(|item| format.to_post(item))
        .collect();
    log::debug!("mapped {} {format:?} entries", posts.len());
    Ok(posts)
}

/// The value of an Atom text construct. `xhtml` constructs carry their
/// text inside a `div`, the markup around it is dropped.
fn atom_text<'a>(entry: &'a Element, local: &str) -> Option<&'a str> {
    entry.child(Some(xml::ATOM), local).map(|construct| {
        if construct.attribute("type") == Some("xhtml") {
            construct.inner_text().trim()
        } else {
            construct.text()
        }
    })
}

fn dc_date(item: &Element) -> Option<DateTime<FixedOffset>> {
    item.text_of(Some(xml::DUBLIN_CORE), "date")
        .and_then(parse_rfc3339)
}

fn parse_rfc2822(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(value.trim())
        .inspect_err(|e| log::debug!("bad rfc 2822 date `{value}`: {e}"))
        .ok()
}

fn parse_rfc3339(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim())
        .inspect_err(|e| log::debug!("bad rfc 3339 date `{value}`: {e}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAUI_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:dc="http://purl.org/dc/elements/1.1/">
<channel>
    <title>.NET Blog</title>
    <item>
        <title>MAUI Update</title>
        <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
        <dc:creator><![CDATA[Jane Doe]]></dc:creator>
        <description>New features</description>
        <content:encoded><![CDATA[<p>Hello</p>]]></content:encoded>
    </item>
    <item>
        <title>Second</title>
        <description>Plain</description>
    </item>
</channel>
</rss>"#;

    fn date(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn maps_rss_item() {
        let posts = parse_posts(MAUI_RSS.as_bytes()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(
            posts[0],
            Post {
                publish_date: Some(date("2024-01-15T10:00:00Z")),
                author: "Jane Doe".to_string(),
                title: "MAUI Update".to_string(),
                description: "New features".to_string(),
                content: "<html><body style='font-family:tahoma;'><p>Hello</p></body></html>"
                    .to_string(),
            }
        );
    }

    #[test]
    fn missing_extensions_default_to_empty() {
        let posts = parse_posts(MAUI_RSS.as_bytes()).unwrap();
        let second = &posts[1];
        assert_eq!(second.title, "Second");
        assert_eq!(second.author, "");
        assert_eq!(second.content, "");
        assert_eq!(second.publish_date, None);
    }

    #[test]
    fn first_creator_wins() {
        let doc = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><channel><item>
            <dc:creator>First</dc:creator><dc:creator>Second</dc:creator>
        </item></channel></rss>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts[0].author, "First");
    }

    #[test]
    fn creator_outside_dublin_core_is_ignored() {
        let doc = r#"<rss xmlns:x="urn:other"><channel><item>
            <x:creator>Someone</x:creator>
        </item></channel></rss>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts[0].author, "");
    }

    #[test]
    fn dc_date_used_when_pub_date_missing() {
        let doc = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><channel><item>
            <pubDate>not a date</pubDate>
            <dc:date>2024-02-01T08:30:00+02:00</dc:date>
        </item></channel></rss>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts[0].publish_date, Some(date("2024-02-01T06:30:00Z")));
    }

    #[test]
    fn keeps_document_order() {
        let items: String = (0..5)
            .map(|i| format!("<item><title>post {i}</title></item>"))
            .collect();
        let doc = format!("<rss><channel>{items}</channel></rss>");
        let titles: Vec<String> = parse_posts(doc.as_bytes())
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["post 0", "post 1", "post 2", "post 3", "post 4"]);
    }

    #[test]
    fn empty_channel_is_not_an_error() {
        let posts = parse_posts(br#"<rss version="2.0"><channel></channel></rss>"#).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn maps_atom_entries() {
        let doc = r#"<feed xmlns="http://www.w3.org/2005/Atom"
                xmlns:dc="http://purl.org/dc/elements/1.1/"
                xmlns:content="http://purl.org/rss/1.0/modules/content/">
            <title>Blog</title>
            <entry>
                <title>Atom post</title>
                <summary>Short</summary>
                <updated>2024-03-01T00:00:00Z</updated>
                <dc:creator>Ann</dc:creator>
                <content:encoded>&lt;b&gt;hi&lt;/b&gt;</content:encoded>
            </entry>
        </feed>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(
            posts,
            vec![Post {
                publish_date: Some(date("2024-03-01T00:00:00Z")),
                author: "Ann".to_string(),
                title: "Atom post".to_string(),
                description: "Short".to_string(),
                content: "<html><body style='font-family:tahoma;'><b>hi</b></body></html>"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn atom_prefers_published_over_updated() {
        let doc = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <published>2024-01-01T00:00:00Z</published>
            <updated>2024-06-01T00:00:00Z</updated>
        </entry></feed>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts[0].publish_date, Some(date("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn atom_xhtml_text_constructs_keep_their_text() {
        let doc = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <title type="xhtml">
                <div xmlns="http://www.w3.org/1999/xhtml">Hello <b>x</b></div>
            </title>
            <summary type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">Short <i>and</i> sweet</div></summary>
        </entry></feed>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts[0].title, "Hello x");
        assert_eq!(posts[0].description, "Short and sweet");
    }

    #[test]
    fn description_and_content_are_verbatim() {
        let doc = r#"<rss xmlns:content="http://purl.org/rss/1.0/modules/content/"><channel><item>
            <title>
                Padded title
            </title>
            <description>  two  spaces
</description>
            <content:encoded><![CDATA[ <p>x</p>
]]></content:encoded>
        </item></channel></rss>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts[0].title, "Padded title");
        assert_eq!(posts[0].description, "  two  spaces\n");
        assert_eq!(
            posts[0].content,
            "<html><body style='font-family:tahoma;'> <p>x</p>\n</body></html>"
        );
    }

    #[test]
    fn maps_rdf_items() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
                xmlns="http://purl.org/rss/1.0/"
                xmlns:dc="http://purl.org/dc/elements/1.1/">
            <channel><title>Old school</title></channel>
            <item><title>One</title><description>d</description><dc:creator>Bo</dc:creator>
                <dc:date>2023-12-31T23:59:59Z</dc:date></item>
            <item><title>Two</title></item>
        </rdf:RDF>"#;
        let posts = parse_posts(doc.as_bytes()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].author, "Bo");
        assert_eq!(posts[0].publish_date, Some(date("2023-12-31T23:59:59Z")));
        assert_eq!(posts[1].title, "Two");
    }

    #[test]
    fn unknown_root_is_rejected() {
        let err = parse_posts(b"<html><body/></html>").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedFormat(ref root) if root == "html"));
        assert!(err.is_parse());
    }
}

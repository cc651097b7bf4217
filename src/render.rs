use std::fmt::Write;

use crate::{Post, Result};

/// Render a post as Markdown for the terminal
pub fn render_post(post: &Post) -> Result<String> {
    let mut out = String::new();
    let title = html_escape::decode_html_entities(&post.title);
    writeln!(out, "# {title}")?;
    let date = post
        .local_publish_date()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string());
    match (post.author.as_str(), date) {
        ("", None) => {}
        ("", Some(date)) => writeln!(out, "{date}")?,
        (author, None) => writeln!(out, "{author}")?,
        (author, Some(date)) => writeln!(out, "{author} - {date}")?,
    }
    if !post.description.is_empty() {
        writeln!(
            out,
            "\n{}",
            html_escape::decode_html_entities(&post.description)
        )?;
    }
    if !post.content.is_empty() {
        let content = htmd::convert(&post.content).unwrap_or_else(|e| {
            log::warn!("Failed to convert post content to markdown: {e}");
            post.content.clone()
        });
        writeln!(out, "\n{}", content.trim())?;
    }
    Ok(out)
}

pub fn render_posts(posts: &[Post]) -> Result<String> {
    let mut out = String::new();
    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            out.push_str("\n---\n\n");
        }
        out.push_str(&render_post(post)?);
    }
    Ok(out)
}

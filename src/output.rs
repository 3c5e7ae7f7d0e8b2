use quillpost::{application::error::AppError, application::render::reading_minutes, domain::posts::Post};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::unexpected(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn print_html(html: &str) {
    println!("{html}");
}

pub fn print_post_table(posts: &[Post]) {
    for post in posts {
        println!(
            "{:<20} {:<40} {}",
            post.publish_date.human(),
            post.slug,
            post.title
        );
    }
}

pub fn print_post_detail(post: &Post) {
    println!("{}", post.title);
    if !post.meta_description.is_empty() {
        println!("{}", post.meta_description);
    }
    println!();
    println!(
        "{} · {} · {} min read",
        post.author,
        post.publish_date.human(),
        reading_minutes(&post.content)
    );
    if !post.categories.is_empty() {
        println!("categories: {}", post.categories.join(", "));
    }
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|tag| format!("#{tag}")).collect();
        println!("tags: {}", tags.join(" "));
    }
    if let Some(url) = post.featured_image_url.as_deref() {
        println!("image: {url}");
    }
}

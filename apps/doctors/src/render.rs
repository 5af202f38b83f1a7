//! Plain-text rendering of the directory page for the terminal.

use client_core::{
    view::{CardImage, DETAILS_HINT, EMPTY_HINT, EMPTY_TITLE, LOADING_TEXT},
    DirectoryLayout, DirectoryPage, DirectorySnapshot, DoctorCard, PageView,
};

pub fn render_page(page: &DirectoryPage, snapshot: &DirectorySnapshot) -> String {
    match page.render(snapshot) {
        PageView::Loading => format!("{LOADING_TEXT}\n"),
        PageView::Empty => format!("{EMPTY_TITLE}\n{EMPTY_HINT}\n"),
        PageView::Directory(layout) => render_layout(&layout),
    }
}

fn render_layout(layout: &DirectoryLayout) -> String {
    let mut out = match layout {
        DirectoryLayout::Carousel { options, slides } => format!(
            "carousel: {} slides, {} per view, loop {}\n",
            slides.len(),
            options.slides_per_view,
            if options.loop_slides { "on" } else { "off" }
        ),
        DirectoryLayout::Grid { columns, cells } => {
            format!("grid: {columns} columns, {} doctors\n", cells.len())
        }
    };
    for card in layout.cards() {
        out.push('\n');
        render_card(&mut out, card);
    }
    out
}

fn render_card(out: &mut String, card: &DoctorCard) {
    let mut name = card.name.lines();
    out.push_str(&format!("* {}\n", name.next().unwrap_or_default()));
    for line in name {
        out.push_str(&format!("  {line}\n"));
    }
    for line in card.specialization.lines() {
        out.push_str(&format!("  {line}\n"));
    }
    if let Some(experience) = &card.experience {
        out.push_str(&format!("  Experience: {experience}\n"));
    }
    if let Some(education) = &card.education {
        out.push_str(&format!("  Education: {education}\n"));
    }
    match &card.image {
        CardImage::Photo(src) => out.push_str(&format!("  Photo: {src}\n")),
        CardImage::Placeholder => out.push_str("  Photo: placeholder\n"),
    }
    out.push_str(&format!("  {DETAILS_HINT}\n"));
    out.push_str(&format!("  More: {}\n", card.detail_href));
}

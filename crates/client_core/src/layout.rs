//! Viewport-driven layout selection for the doctor directory.

use tracing::debug;

use crate::view::DoctorCard;

/// Widths below this render the compact carousel.
pub const COMPACT_BREAKPOINT: u32 = 768;
pub const LARGE_BREAKPOINT: u32 = 1024;
pub const EXTRA_LARGE_BREAKPOINT: u32 = 1280;

/// Looping a carousel of one or two slides only shows the same cards again.
const MIN_SLIDES_FOR_LOOP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Compact,
    Wide,
}

impl LayoutMode {
    pub fn for_width(width: u32) -> Self {
        if width < COMPACT_BREAKPOINT {
            LayoutMode::Compact
        } else {
            LayoutMode::Wide
        }
    }
}

pub fn grid_columns(width: u32) -> usize {
    if width >= EXTRA_LARGE_BREAKPOINT {
        4
    } else if width >= LARGE_BREAKPOINT {
        3
    } else {
        2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselOptions {
    pub slides_per_view: f32,
    pub space_between: u32,
    pub centered_slides: bool,
    pub navigation: bool,
    pub clickable_pagination: bool,
    pub loop_slides: bool,
}

impl CarouselOptions {
    pub fn for_slide_count(count: usize) -> Self {
        Self {
            slides_per_view: 1.5,
            space_between: 10,
            centered_slides: true,
            navigation: true,
            clickable_pagination: true,
            loop_slides: count >= MIN_SLIDES_FOR_LOOP,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryLayout {
    Carousel {
        options: CarouselOptions,
        slides: Vec<DoctorCard>,
    },
    Grid {
        columns: usize,
        cells: Vec<DoctorCard>,
    },
}

impl DirectoryLayout {
    pub fn mode(&self) -> LayoutMode {
        match self {
            DirectoryLayout::Carousel { .. } => LayoutMode::Compact,
            DirectoryLayout::Grid { .. } => LayoutMode::Wide,
        }
    }

    pub fn cards(&self) -> &[DoctorCard] {
        match self {
            DirectoryLayout::Carousel { slides, .. } => slides,
            DirectoryLayout::Grid { cells, .. } => cells,
        }
    }
}

/// Tracks the viewport width and lays cards out for it.
#[derive(Debug, Clone)]
pub struct ResponsiveRenderer {
    width: u32,
    mode: LayoutMode,
}

impl ResponsiveRenderer {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            mode: LayoutMode::for_width(width),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Records a resize event. Returns `true` when the layout mode flipped.
    pub fn resize(&mut self, width: u32) -> bool {
        let mode = LayoutMode::for_width(width);
        let changed = mode != self.mode;
        if changed {
            debug!(from = ?self.mode, to = ?mode, width, "layout: mode changed");
        }
        self.width = width;
        self.mode = mode;
        changed
    }

    pub fn layout(&self, cards: Vec<DoctorCard>) -> DirectoryLayout {
        match self.mode {
            LayoutMode::Compact => DirectoryLayout::Carousel {
                options: CarouselOptions::for_slide_count(cards.len()),
                slides: cards,
            },
            LayoutMode::Wide => DirectoryLayout::Grid {
                columns: grid_columns(self.width),
                cells: cards,
            },
        }
    }
}

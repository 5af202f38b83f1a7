//! Presentation-neutral view model for the doctor directory page.

use shared::domain::{Doctor, DoctorId};

use crate::{
    controller::DirectorySnapshot,
    filter::filter_doctors,
    layout::{DirectoryLayout, LayoutMode, ResponsiveRenderer},
};

pub const LOADING_TEXT: &str = "Loading doctors...";
pub const EMPTY_TITLE: &str = "No doctors found.";
pub const EMPTY_HINT: &str = "Please change the search parameters or try again later.";
pub const DETAILS_HINT: &str = "Reception days and other details: see 'More'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    Photo(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCard {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub image: CardImage,
    pub detail_href: String,
}

impl DoctorCard {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            experience: doctor.visible_experience().map(str::to_string),
            education: doctor.visible_education().map(str::to_string),
            image: match doctor.photo() {
                Some(src) => CardImage::Photo(src.to_string()),
                None => CardImage::Placeholder,
            },
            detail_href: format!("/doctors/{}", doctor.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    Empty,
    Directory(DirectoryLayout),
}

/// Search box plus viewport state for one rendering surface.
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    query: String,
    renderer: ResponsiveRenderer,
}

impl DirectoryPage {
    pub fn new(width: u32) -> Self {
        Self {
            query: String::new(),
            renderer: ResponsiveRenderer::new(width),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn resize(&mut self, width: u32) -> bool {
        self.renderer.resize(width)
    }

    pub fn mode(&self) -> LayoutMode {
        self.renderer.mode()
    }

    pub fn filtered<'a>(&self, snapshot: &'a DirectorySnapshot) -> Vec<&'a Doctor> {
        filter_doctors(&snapshot.doctors, &self.query)
    }

    /// Cached data is shown while the fetch is still pending; the loading
    /// indicator only covers the case where nothing is known yet.
    pub fn render(&self, snapshot: &DirectorySnapshot) -> PageView {
        if snapshot.loading && snapshot.doctors.is_empty() {
            return PageView::Loading;
        }

        let cards: Vec<DoctorCard> = self
            .filtered(snapshot)
            .into_iter()
            .map(DoctorCard::from_doctor)
            .collect();
        if cards.is_empty() {
            return PageView::Empty;
        }

        PageView::Directory(self.renderer.layout(cards))
    }
}

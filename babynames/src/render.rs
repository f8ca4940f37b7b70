//! HTML pages.

use std::collections::BTreeMap;

use handlebars::{handlebars_helper, Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::gender::Gender;
use crate::lookup::LookupResult;
use crate::store::NameRecord;

const NO_RECORDS: &str = "norecords";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Page {
    #[serde(rename = "name_detail")]
    NameDetail,
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "404")]
    NotFound,
}

impl Page {
    pub fn template(self) -> &'static str {
        match self {
            Page::NameDetail => "name_detail",
            Page::Home => "home",
            Page::NotFound => "404",
        }
    }
}

/// Data a page template is rendered with.
#[derive(Debug, Serialize)]
pub struct PageContext {
    page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_data: Option<BTreeMap<Gender, NameRecord>>,
}

impl PageContext {
    pub fn no_records(page: Page) -> Self {
        Self {
            page,
            status: Some(NO_RECORDS),
            name_data: None,
        }
    }

    pub fn lookup(page: Page, result: LookupResult) -> Self {
        match result {
            LookupResult::NoRecords => Self::no_records(page),
            LookupResult::Found(records) => Self {
                page,
                status: None,
                name_data: Some(records),
            },
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }
}

handlebars_helper!(gender_label: |code: str| {
    Gender::from_code(code).map(Gender::label).unwrap_or(code).to_string()
});

// Year entries are the maps carrying a `counted` statistic, zero included.
handlebars_helper!(year_stats: |value: Json| {
    value.get("counted").is_some_and(|counted| counted.is_number())
});

/// Template registry, built once per process.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_helper("gender_label", Box::new(gender_label));
        registry.register_helper("year_stats", Box::new(year_stats));
        registry.register_template_string("header", include_str!("../templates/header.hbs"))?;
        registry.register_template_string("footer", include_str!("../templates/footer.hbs"))?;
        registry.register_template_string(
            Page::NameDetail.template(),
            include_str!("../templates/name_detail.hbs"),
        )?;
        registry.register_template_string(Page::Home.template(), include_str!("../templates/home.hbs"))?;
        registry.register_template_string(
            Page::NotFound.template(),
            include_str!("../templates/404.hbs"),
        )?;
        Ok(Self { registry })
    }

    pub fn render(&self, context: &PageContext) -> Result<String, RenderError> {
        self.registry.render(context.page.template(), context)
    }
}

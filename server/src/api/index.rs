use axum::{
    extract::{Form, State},
    response::Html,
};
use serde_derive::Deserialize;

use super::{page::Page, AppState, Error};
use crate::lookup::{aggregate, banner, input};

#[derive(Default, Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    date: String,
    #[serde(default)]
    start_year: String,
    #[serde(default)]
    end_year: String,
}

pub async fn show(State(state): State<AppState>) -> Result<Html<String>, Error> {
    let today = (state.today)();
    let date_value = base::util::iso_date(today);
    let page = Page {
        date_value: date_value.as_str(),
        start_year: state.settings.range.floor_year,
        end_year: today.year(),
        current_year: today.year(),
        ..Default::default()
    };
    Ok(Html(page.render()?))
}

pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, Error> {
    let today = (state.today)();
    let date_value = form.date.trim();
    let resolution = input::resolve(
        date_value,
        form.start_year.as_str(),
        form.end_year.as_str(),
        &state.settings.range,
        today,
    );
    let mut notices = resolution.notices;
    let records = match &resolution.lookup {
        Some(lookup) => {
            let opts = aggregate::Options::from(&state.settings.musicbrainz);
            let result = aggregate::aggregate(state.catalog.as_ref(), lookup, &opts).await;
            notices.extend(result.error);
            Some(result.records)
        }
        None => None,
    };

    let page = Page {
        date_value,
        start_year: resolution.start_year,
        end_year: resolution.end_year,
        current_year: today.year(),
        pretty_date: resolution.pretty_date.as_str(),
        banner: banner(&notices),
        results: records.as_deref(),
    };
    Ok(Html(page.render()?))
}

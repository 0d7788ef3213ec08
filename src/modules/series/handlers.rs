//! Admin series actions. Each one resolves the series, applies a single
//! mutation, persists it and redirects with a flash message.

use axum::extract::{Path, State};

use italia_http::{AppError, FlashRedirect, ValidatedForm, View};

use super::models::SeriesForm;
use crate::domain::Series;
use crate::repositories::{RepositoryError, SeriesRepository};
use crate::utils::parse_id;

const INDEX: &str = "/admin/series";
const ADD: &str = "/admin/series/add";

const NOT_AVAILABLE: &str = "La serie selezionata non è più disponibile.";
const ALREADY_REMOVED: &str = "La serie scelta è stata già rimossa.";
const UPDATE_FAILED: &str = "Errori in fase di modifica. Riprovare.";
const CREATE_FAILED: &str = "Problemi in fase di salvataggio. Riprovare.";
const DELETE_FAILED: &str = "Impossibile cancellare la serie scelta. Riprovare.";

const CREATED: &str = "La serie è stata aggiunta correttamente.";
const PUBLISHED: &str = "La serie è stata messa in pubblicazione correttamente.";
const UNPUBLISHED: &str = "La serie è stata rimossa dalla pubblicazione correttamente.";
const COMPLETED: &str = "La serie è stata contrassegnata come completata.";
const INCOMPLETE: &str = "La serie è stata contrassegnata come non completata.";
const EDITED: &str = "Serie modificata correttamente.";
const DELETED: &str = "La serie è stata cancellata correttamente.";

/// Load the series named by the path segment, or the redirect to send when it
/// cannot be found.
async fn resolve(
    repository: &SeriesRepository,
    raw_id: &str,
    missing_message: &'static str,
) -> Result<Series, FlashRedirect> {
    let missing = || FlashRedirect::to(INDEX).error(missing_message);

    let Some(id) = parse_id(raw_id) else {
        return Err(missing());
    };

    match repository.find_by_id(id).await {
        Ok(series) => Ok(series),
        Err(RepositoryError::NotFound { .. }) => Err(missing()),
        Err(err) => {
            tracing::error!(series_id = id, error = %err, "series lookup failed");
            Err(missing())
        }
    }
}

/// Shared body of the flag actions: flip one flag and persist.
async fn update_flag(
    repository: &SeriesRepository,
    raw_id: &str,
    apply: impl FnOnce(&mut Series),
    success_message: &'static str,
) -> FlashRedirect {
    let mut series = match resolve(repository, raw_id, NOT_AVAILABLE).await {
        Ok(series) => series,
        Err(redirect) => return redirect,
    };

    apply(&mut series);

    match repository.save(&mut series).await {
        Ok(()) => FlashRedirect::to(INDEX).success(success_message),
        Err(_) => FlashRedirect::to(INDEX).error(UPDATE_FAILED),
    }
}

pub async fn index(State(repository): State<SeriesRepository>) -> Result<View, AppError> {
    let series = repository.get_all().await.map_err(AppError::internal)?;
    Ok(View::new("admin.series_index").with("series", &series))
}

pub async fn add_form() -> View {
    View::new("admin.series_add")
}

pub async fn create(
    State(repository): State<SeriesRepository>,
    ValidatedForm(form): ValidatedForm<SeriesForm>,
) -> FlashRedirect {
    let mut series = Series::from_title_description_and_meta(
        form.title.as_str(),
        form.description.as_str(),
        form.metadescription.as_str(),
    );

    if repository.save(&mut series).await.is_err() {
        return FlashRedirect::to(ADD).error(CREATE_FAILED).with_input(&form);
    }

    tracing::info!(series_id = ?series.id, "series created");
    FlashRedirect::to(INDEX).success(CREATED)
}

pub async fn publish(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
) -> FlashRedirect {
    update_flag(&repository, &id, |series| series.is_published = true, PUBLISHED).await
}

pub async fn unpublish(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
) -> FlashRedirect {
    update_flag(&repository, &id, |series| series.is_published = false, UNPUBLISHED).await
}

pub async fn complete(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
) -> FlashRedirect {
    update_flag(&repository, &id, |series| series.is_completed = true, COMPLETED).await
}

pub async fn incomplete(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
) -> FlashRedirect {
    update_flag(&repository, &id, |series| series.is_completed = false, INCOMPLETE).await
}

pub async fn edit_form(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
) -> Result<View, FlashRedirect> {
    let series = resolve(&repository, &id, NOT_AVAILABLE).await?;
    Ok(View::new("admin.series_edit").with("series", &series))
}

pub async fn update(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
    ValidatedForm(form): ValidatedForm<SeriesForm>,
) -> FlashRedirect {
    let mut series = match resolve(&repository, &id, NOT_AVAILABLE).await {
        Ok(series) => series,
        Err(redirect) => return redirect,
    };

    series.title = form.title;
    series.description = form.description;
    series.metadescription = form.metadescription;

    match repository.save(&mut series).await {
        Ok(()) => FlashRedirect::to(format!("/admin/series/edit/{id}")).success(EDITED),
        Err(_) => FlashRedirect::to(INDEX).error(UPDATE_FAILED),
    }
}

pub async fn delete(
    State(repository): State<SeriesRepository>,
    Path(id): Path<String>,
) -> FlashRedirect {
    let series = match resolve(&repository, &id, ALREADY_REMOVED).await {
        Ok(series) => series,
        Err(redirect) => return redirect,
    };

    match repository.delete(&series).await {
        Ok(()) => FlashRedirect::to(INDEX).success(DELETED),
        Err(_) => FlashRedirect::to(INDEX).error(DELETE_FAILED),
    }
}

//! Ownership checks shared by the project and tree services.

use validator::ValidationErrors;

use cipherstudio_core::error::{AppError, ErrorKind};
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::ProjectId;
use cipherstudio_database::ProjectRepository;
use cipherstudio_entity::project::Project;

use crate::context::RequestContext;

/// Load a project and require that the caller owns it.
///
/// A missing project is `NotFound`; someone else's project is `Forbidden`.
pub(crate) async fn owned_project(
    projects: &dyn ProjectRepository,
    project_id: &ProjectId,
    ctx: &RequestContext,
) -> AppResult<Project> {
    let project = projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;

    if !project.is_owned_by(ctx.user_id) {
        return Err(AppError::forbidden(
            "Not authorized to access this project",
        ));
    }
    Ok(project)
}

/// Wrap `validator` failures as `Validation` errors.
pub(crate) fn invalid(errors: ValidationErrors) -> AppError {
    let message = format!("Invalid input: {errors}");
    AppError::with_source(ErrorKind::Validation, message, errors)
}

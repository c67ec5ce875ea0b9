use std::sync::Arc;

use campus_proto::models::{DetailedProfile, UserProfile};
use serde_json::Value;

use crate::action::{perform, ActionOutcome};
use crate::api::users;
use crate::session::PageContext;
use crate::validation::{non_blank, ProfileForm};
use crate::view::list::show_failure;
use crate::view::markup::escape_html;
use crate::view::templates::{activity_row, completion_meter, detailed_profile, profile_summary};
use crate::view::{render_list, ListView, RenderOutcome};

pub const PROFILE_SUMMARY: &str = "profileSummary";
pub const PROFILE_DETAILS: &str = "profileDetails";
pub const PROFILE_COMPLETION: &str = "profileCompletion";
pub const PROFILE_FEEDBACK: &str = "profileFeedback";
pub const JOINED_ACTIVITIES: &str = "joinedActivities";
pub const FAVORITE_ACTIVITIES: &str = "favoriteActivities";

pub const INPUT_USERNAME: &str = "username";
pub const INPUT_EMAIL: &str = "email";
pub const INPUT_BIO: &str = "bio";
pub const INPUT_MAJOR: &str = "major";
pub const INPUT_PASSWORD: &str = "password";
pub const INPUT_CONFIRM_PASSWORD: &str = "confirmPassword";

/// Share of detailed-profile fields that are filled in, 0-100 rounded down.
pub fn completion_score(profile: &DetailedProfile) -> u8 {
    let text_fields = [
        &profile.real_name,
        &profile.gender,
        &profile.birthday,
        &profile.major,
        &profile.grade,
        &profile.phone,
        &profile.email,
        &profile.bio,
        &profile.avatar,
    ];
    let filled = text_fields
        .iter()
        .filter(|value| value.as_deref().is_some_and(|text| !text.trim().is_empty()))
        .count()
        + usize::from(!profile.interests.is_empty());
    let total = text_fields.len() + 1;

    (filled * 100 / total) as u8
}

pub struct ProfilePage {
    ctx: Arc<PageContext>,
    summary: ListView,
    details: ListView,
    joined: ListView,
    favorites: ListView,
}

impl ProfilePage {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            summary: ListView::new(PROFILE_SUMMARY, "Profile not found", "Failed to load profile"),
            details: ListView::new(
                PROFILE_DETAILS,
                "No details yet",
                "Failed to load profile details",
            ),
            joined: ListView::new(
                JOINED_ACTIVITIES,
                "You have not joined any activities",
                "Failed to load joined activities",
            ),
            favorites: ListView::new(
                FAVORITE_ACTIVITIES,
                "No favorite activities",
                "Failed to load favorites",
            ),
        }
    }

    /// Every section of the page, fetched side by side.
    pub async fn load(&self) -> [RenderOutcome; 4] {
        let (profile, details, joined, favorites) = tokio::join!(
            self.load_profile(),
            self.load_details(),
            self.load_joined(),
            self.load_favorites(),
        );
        [profile, details, joined, favorites]
    }

    /// Summary card plus the edit form's initial values.
    pub async fn load_profile(&self) -> RenderOutcome {
        match users::fetch_profile(&self.ctx.api).await {
            Ok(profile) => {
                self.ctx
                    .surface
                    .replace(PROFILE_SUMMARY, profile_summary(&profile));
                self.fill_form(&profile);
                RenderOutcome::Rendered(1)
            }
            Err(err) => show_failure(&self.ctx, &self.summary, err),
        }
    }

    fn fill_form(&self, profile: &UserProfile) {
        let surface = &self.ctx.surface;
        surface.set_input_value(INPUT_USERNAME, &profile.username);
        surface.set_input_value(INPUT_EMAIL, profile.email.as_deref().unwrap_or_default());
        surface.set_input_value(INPUT_BIO, profile.bio.as_deref().unwrap_or_default());
        surface.set_input_value(INPUT_MAJOR, profile.major.as_deref().unwrap_or_default());
        surface.set_input_value(INPUT_PASSWORD, "");
        surface.set_input_value(INPUT_CONFIRM_PASSWORD, "");
    }

    pub async fn load_details(&self) -> RenderOutcome {
        match users::fetch_detailed_profile(&self.ctx.api).await {
            Ok(profile) => {
                let score = completion_score(&profile);
                self.ctx
                    .surface
                    .replace(PROFILE_DETAILS, detailed_profile(&profile));
                self.ctx
                    .surface
                    .replace(PROFILE_COMPLETION, completion_meter(score));
                RenderOutcome::Rendered(1)
            }
            Err(err) => {
                self.ctx.surface.replace(PROFILE_COMPLETION, String::new());
                show_failure(&self.ctx, &self.details, err)
            }
        }
    }

    pub async fn load_joined(&self) -> RenderOutcome {
        render_list(
            &self.ctx,
            &self.joined,
            users::fetch_joined_activities(&self.ctx.api),
            activity_row,
        )
        .await
    }

    pub async fn load_favorites(&self) -> RenderOutcome {
        render_list(
            &self.ctx,
            &self.favorites,
            users::fetch_favorites(&self.ctx.api),
            activity_row,
        )
        .await
    }

    /// Current values of the edit form.
    pub fn read_form(&self) -> ProfileForm {
        let input = |field: &str| self.ctx.surface.input_value(field);
        ProfileForm {
            username: input(INPUT_USERNAME).trim().to_string(),
            email: non_blank(&input(INPUT_EMAIL)),
            bio: non_blank(&input(INPUT_BIO)),
            major: non_blank(&input(INPUT_MAJOR)),
            password: non_blank(&input(INPUT_PASSWORD)),
            password_confirmation: non_blank(&input(INPUT_CONFIRM_PASSWORD)),
        }
    }

    /// Validation problems stay inline in the form and send nothing.
    pub async fn update_profile(&self, form: ProfileForm) -> ActionOutcome<Value> {
        let request = match form.into_request() {
            Ok(request) => request,
            Err(err) => {
                tracing::info!(
                    component = "profile",
                    message = %err.message,
                    "profile form rejected"
                );
                self.ctx.surface.replace(
                    PROFILE_FEEDBACK,
                    format!(
                        r#"<div class="invalid-feedback d-block">{}</div>"#,
                        escape_html(&err.message)
                    ),
                );
                return ActionOutcome::Failed(err);
            }
        };
        self.ctx.surface.replace(PROFILE_FEEDBACK, String::new());

        let outcome = perform(
            &self.ctx,
            "profile.update",
            users::update_profile(&self.ctx.api, &request),
            "Profile updated",
        )
        .await;

        if outcome.succeeded() {
            self.load_profile().await;
        }
        outcome
    }

    pub async fn update_details(&self, profile: DetailedProfile) -> ActionOutcome<Value> {
        let outcome = perform(
            &self.ctx,
            "profile.update_details",
            users::update_detailed_profile(&self.ctx.api, &profile),
            "Profile details updated",
        )
        .await;

        if outcome.succeeded() {
            self.load_details().await;
        }
        outcome
    }
}

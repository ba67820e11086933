use actix_web::{web, HttpResponse};
use geetest_relay_domain::model::{validate_link_tokens, DiscordId, Game, GeetestSolution};
use geetest_relay_domain::storage::{ChallengeStore, UserStore};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pages;
use crate::state::AppState;

use super::ApiError;

/// Plaintext acknowledgement returned once a result is stored; the page shows
/// it verbatim to send the user back to the bot.
pub const RESULT_SAVED_MESSAGE: &str = "Validation result has been saved to the database! You can return to the bot and use the /daily command for sign-in.";

/// Solved-widget payload POSTed by the challenge page.
#[derive(Debug, Deserialize, Serialize)]
pub struct GeetestResult {
    pub geetest_challenge: String,
    pub geetest_validate: String,
    pub geetest_seccode: String,
}

impl From<GeetestResult> for GeetestSolution {
    fn from(result: GeetestResult) -> Self {
        Self {
            challenge: result.geetest_challenge,
            validate: result.geetest_validate,
            seccode: result.geetest_seccode,
        }
    }
}

pub async fn solve_page_handler(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (game_raw, discord_id_raw, gt, challenge) = path.into_inner();
    let (game, discord_id) = parse_target(&game_raw, &discord_id_raw)?;
    ensure_registered(&state, discord_id).await?;
    if let Err(err) = validate_link_tokens(&gt, &challenge) {
        counter!("api_geetest_pages_total", "status" => "invalid_link").increment(1);
        return Err(err.into());
    }

    counter!("api_geetest_pages_total", "status" => "served").increment(1);
    info!(%game, %discord_id, %gt, %challenge, "serving challenge page");
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::challenge_page(game, discord_id, &gt, &challenge)))
}

pub async fn save_result_handler(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: web::Json<GeetestResult>,
) -> Result<HttpResponse, ApiError> {
    let (game_raw, discord_id_raw) = path.into_inner();
    let (game, discord_id) = parse_target(&game_raw, &discord_id_raw)?;
    ensure_registered(&state, discord_id).await?;

    state
        .storage()
        .upsert_solution(discord_id, game, payload.into_inner().into())
        .await?;

    counter!("api_geetest_results_total", "game" => game.as_ref().to_owned()).increment(1);
    info!(%game, %discord_id, "saved solved challenge");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(RESULT_SAVED_MESSAGE))
}

fn parse_target(game_raw: &str, discord_id_raw: &str) -> Result<(Game, DiscordId), ApiError> {
    let game = game_raw
        .parse::<Game>()
        .map_err(|_| ApiError::UnknownGame(game_raw.to_owned()))?;
    let discord_id = DiscordId::parse(discord_id_raw)?;
    Ok((game, discord_id))
}

async fn ensure_registered(state: &AppState, discord_id: DiscordId) -> Result<(), ApiError> {
    match state.storage().find_user(discord_id).await? {
        Some(_) => Ok(()),
        None => {
            counter!("api_geetest_unregistered_total").increment(1);
            Err(ApiError::NotRegistered)
        }
    }
}

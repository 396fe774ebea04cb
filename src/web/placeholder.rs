use base64::Engine;
use base64::engine::general_purpose;

use super::prelude::*;
use crate::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH, IMAGE_CONTENT_TYPE, MAX_DIMENSION};
use crate::render::{self, RenderRequest};

/// Raw query string of `/placeholder`, validated into a [`RenderRequest`].
///
/// Built from decoded key/value pairs. A repeated key keeps its first value
/// and unknown keys are ignored.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderQuery {
    prompt: Option<String>,
    width: Option<String>,
    height: Option<String>,
    return_file: Option<String>,
}

impl FromIterator<(String, String)> for PlaceholderQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "prompt" => &mut query.prompt,
                "width" => &mut query.width,
                "height" => &mut query.height,
                "return_file" => &mut query.return_file,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

#[derive(Debug, Serialize)]
struct Dimensions {
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
struct PlaceholderJson {
    success: bool,
    prompt: String,
    dimensions: Dimensions,
    image: String,
}

fn parse_dimension(
    value: Option<&str>,
    name: &'static str,
    default: u32,
) -> Result<i64, PlaceholderError> {
    match value {
        None => Ok(i64::from(default)),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| PlaceholderError::InvalidParameter(name)),
    }
}

impl TryFrom<PlaceholderQuery> for RenderRequest {
    type Error = PlaceholderError;

    fn try_from(query: PlaceholderQuery) -> Result<Self, Self::Error> {
        let text = query
            .prompt
            .filter(|prompt| !prompt.is_empty())
            .ok_or(PlaceholderError::MissingPrompt)?;

        let width = parse_dimension(query.width.as_deref(), "width", DEFAULT_WIDTH)?;
        let height = parse_dimension(query.height.as_deref(), "height", DEFAULT_HEIGHT)?;
        let max = i64::from(MAX_DIMENSION);
        if width > max || height > max {
            return Err(PlaceholderError::DimensionsTooLarge);
        }
        if width < 1 || height < 1 {
            return Err(PlaceholderError::DimensionsTooSmall);
        }

        let return_as_file = query
            .return_file
            .is_none_or(|value| value.eq_ignore_ascii_case("true"));

        Ok(Self {
            text,
            width: width as u32,
            height: height as u32,
            return_as_file,
        })
    }
}

/// handles GET /placeholder
pub(crate) async fn placeholder_handler(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, PlaceholderError> {
    let Query(pairs) = pairs?;
    let query: PlaceholderQuery = pairs.into_iter().collect();
    let context = format!(
        "prompt={:?} width={:?} height={:?}",
        query.prompt, query.width, query.height
    );
    let request = RenderRequest::try_from(query).inspect_err(|err| {
        info!("Rejected placeholder request ({}): {}", context, err);
    })?;

    info!("Generating placeholder image for: {}", request.text);

    let fonts = state.fonts.clone();
    let quality = state.jpeg_quality;
    let job = request.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        let canvas = render::render_placeholder(&fonts, &job.text, job.width, job.height);
        render::encode_jpeg(&canvas, quality)
    })
    .await
    .map_err(PlaceholderError::from)
    .and_then(|encoded| encoded)
    .inspect_err(|err| {
        error!(
            "Failed to render placeholder for {:?} at {}x{}: {}",
            request.text, request.width, request.height, err
        );
    })?;

    if request.return_as_file {
        return Ok(([(CONTENT_TYPE, IMAGE_CONTENT_TYPE)], bytes).into_response());
    }

    let encoded = general_purpose::STANDARD.encode(&bytes);
    Ok(Json(PlaceholderJson {
        success: true,
        prompt: request.text,
        dimensions: Dimensions {
            width: request.width,
            height: request.height,
        },
        image: format!("data:{IMAGE_CONTENT_TYPE};base64,{encoded}"),
    })
    .into_response())
}

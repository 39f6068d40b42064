use handscope_engine::{
    calculate_raise_frequencies, parse_hands, AnalysisConfig, PlayerTarget,
    RaiseQualificationPolicy,
};
use tokio_stream::StreamExt;
use warp::http::StatusCode;
use warp::hyper::body::Buf;
use warp::multipart::{FormData, Part};
use warp::reply::{self, Response};
use warp::Reply;

use crate::errors::{IntoErrorResponse, UploadError};
use crate::params::{AnalysisRequest, FrequencyRecord, FrequencyResponse};
use crate::server::AppContext;

/// The two analysis endpoints, differing only in qualification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /rfi_6_9`
    OpenRaise,
    /// `POST /allin_6_9`
    Shove,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::OpenRaise => "rfi_6_9",
            Endpoint::Shove => "allin_6_9",
        }
    }

    /// The open-raise endpoint follows the configured policy.
    pub fn policy(&self, config: &AnalysisConfig) -> RaiseQualificationPolicy {
        match self {
            Endpoint::OpenRaise => config.policy,
            Endpoint::Shove => RaiseQualificationPolicy::SHOVE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// As sent by the client; only checked for emptiness
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fields of an analysis upload. The first occurrence of each field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub params: Option<String>,
    pub player_name: Option<String>,
}

pub async fn read_form(form: FormData) -> Result<UploadForm, UploadError> {
    let mut parts = Box::pin(form);
    let mut upload = UploadForm::default();

    while let Some(part) = parts.next().await {
        let part = part.map_err(|err| UploadError::InvalidForm(err.to_string()))?;
        let name = part.name().to_string();
        let filename = part.filename().map(str::to_string);
        let bytes = read_part(part).await?;

        match (name.as_str(), filename) {
            ("file", Some(filename)) if upload.file.is_none() => {
                upload.file = Some(UploadedFile { filename, bytes });
            }
            ("params", _) if upload.params.is_none() => {
                upload.params = Some(text_field(&name, bytes)?);
            }
            ("player_name", _) if upload.player_name.is_none() => {
                upload.player_name = Some(text_field(&name, bytes)?);
            }
            _ => tracing::debug!(field = %name, "ignoring form field"),
        }
    }
    Ok(upload)
}

async fn read_part(mut part: Part) -> Result<Vec<u8>, UploadError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = part.data().await {
        let mut chunk = chunk.map_err(|err| UploadError::InvalidForm(err.to_string()))?;
        while chunk.has_remaining() {
            let slice = chunk.chunk();
            let len = slice.len();
            bytes.extend_from_slice(slice);
            chunk.advance(len);
        }
    }
    Ok(bytes)
}

fn text_field(name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
    String::from_utf8(bytes)
        .map_err(|_| UploadError::InvalidForm(format!("field {name} is not UTF-8")))
}

/// Handles one analysis upload end to end.
pub async fn analyze(context: AppContext, endpoint: Endpoint, form: Option<FormData>) -> Response {
    match run_analysis(&context, endpoint, form).await {
        Ok(body) => reply::with_status(reply::json(&body), StatusCode::OK).into_response(),
        Err(err) => err.into_http_response(),
    }
}

async fn run_analysis(
    context: &AppContext,
    endpoint: Endpoint,
    form: Option<FormData>,
) -> Result<FrequencyResponse, UploadError> {
    let form = match form {
        Some(form) => read_form(form).await?,
        None => UploadForm::default(),
    };
    let file = form.file.ok_or(UploadError::NoFilePart)?;
    if file.filename.is_empty() {
        return Err(UploadError::NoSelectedFile);
    }
    let request =
        AnalysisRequest::from_form(form.params.as_deref(), form.player_name.as_deref())?;

    let transcript = context.stager().stage_text(&file.bytes).await?;
    let analysis = context.analysis();
    let policy = endpoint.policy(&analysis);
    let hands = parse_hands(&transcript, &analysis.table);
    let target = PlayerTarget::Player(request.player_name.clone());

    let mut data = Vec::with_capacity(request.set_count());
    for group in &request.groups {
        for set in &group.sets {
            let frequencies =
                calculate_raise_frequencies(&hands, &analysis.groups, &target, &set.filters, policy);
            data.push(FrequencyRecord::new(group, set, &frequencies));
        }
    }

    tracing::info!(
        endpoint = endpoint.path(),
        player = %request.player_name,
        hands = hands.len(),
        records = data.len(),
        "analysis completed"
    );
    Ok(FrequencyResponse { data })
}

//! Display parameters for a resolved image and the CDN transform-string grammar.
//!
//! The transform string is a comma-separated list of `<prefix>_<value>` tokens:
//! `c_<crop>`, `g_<gravity>`, `w_<n>`, `h_<n>`, `q_<n|auto>`, `f_<fmt|auto>`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::AppError;

/// Requested output quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Auto,
    Value(u8),
}

impl Quality {
    /// Clamp to the 1..=100 range the CDN accepts.
    pub fn new(value: u32) -> Self {
        Quality::Value(value.clamp(1, 100) as u8)
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Quality::Auto => write!(f, "auto"),
            Quality::Value(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Quality {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Quality::Auto);
        }
        let value: u32 = s
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("Invalid quality: {}", s)))?;
        if !(1..=100).contains(&value) {
            return Err(AppError::InvalidInput(format!(
                "Quality must be between 1 and 100, got {}",
                value
            )));
        }
        Ok(Quality::Value(value as u8))
    }
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Auto,
    Webp,
    Avif,
    Jpg,
    Png,
    Gif,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Auto => "auto",
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ImageFormat::Auto),
            "webp" => Ok(ImageFormat::Webp),
            "avif" => Ok(ImageFormat::Avif),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "png" => Ok(ImageFormat::Png),
            "gif" => Ok(ImageFormat::Gif),
            other => Err(AppError::InvalidInput(format!("Invalid format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    #[default]
    Fill,
    Fit,
    Limit,
    Scale,
    Thumb,
    Pad,
}

impl CropMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropMode::Fill => "fill",
            CropMode::Fit => "fit",
            CropMode::Limit => "limit",
            CropMode::Scale => "scale",
            CropMode::Thumb => "thumb",
            CropMode::Pad => "pad",
        }
    }
}

impl FromStr for CropMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fill" => Ok(CropMode::Fill),
            "fit" => Ok(CropMode::Fit),
            "limit" => Ok(CropMode::Limit),
            "scale" => Ok(CropMode::Scale),
            "thumb" => Ok(CropMode::Thumb),
            "pad" => Ok(CropMode::Pad),
            other => Err(AppError::InvalidInput(format!("Invalid crop mode: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    #[default]
    Center,
    Auto,
    Face,
    North,
    South,
    East,
    West,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::Center => "center",
            Gravity::Auto => "auto",
            Gravity::Face => "face",
            Gravity::North => "north",
            Gravity::South => "south",
            Gravity::East => "east",
            Gravity::West => "west",
        }
    }
}

impl FromStr for Gravity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Gravity::Center),
            "auto" => Ok(Gravity::Auto),
            "face" => Ok(Gravity::Face),
            "north" => Ok(Gravity::North),
            "south" => Ok(Gravity::South),
            "east" => Ok(Gravity::East),
            "west" => Ok(Gravity::West),
            other => Err(AppError::InvalidInput(format!("Invalid gravity: {}", other))),
        }
    }
}

/// Requested display parameters for one rendered image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<Quality>,
    pub format: Option<ImageFormat>,
    #[serde(default)]
    pub crop: CropMode,
    #[serde(default)]
    pub gravity: Gravity,
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero means "not requested".
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width).filter(|w| *w > 0);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height).filter(|h| *h > 0);
        self
    }

    pub fn quality(mut self, quality: u32) -> Self {
        self.quality = Some(Quality::new(quality));
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn crop(mut self, crop: CropMode) -> Self {
        self.crop = crop;
        self
    }

    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Render as a CDN transform string, e.g. `c_fill,g_center,w_400,q_85,f_auto`.
    ///
    /// Width and height are omitted when not requested; quality and format
    /// default to `auto`.
    pub fn to_cdn_transformation(&self) -> String {
        let mut tokens = vec![
            format!("c_{}", self.crop.as_str()),
            format!("g_{}", self.gravity.as_str()),
        ];
        if let Some(w) = self.requested_width() {
            tokens.push(format!("w_{}", w));
        }
        if let Some(h) = self.requested_height() {
            tokens.push(format!("h_{}", h));
        }
        tokens.push(format!("q_{}", self.quality.unwrap_or(Quality::Auto)));
        tokens.push(format!(
            "f_{}",
            self.format.unwrap_or(ImageFormat::Auto).as_str()
        ));
        tokens.join(",")
    }

    /// Query-string hints for URLs that are not transformed server-side.
    ///
    /// Quality is only emitted when a concrete value was requested; the format
    /// hint defaults to `webp`.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(w) = self.requested_width() {
            params.push(("width", w.to_string()));
        }
        if let Some(h) = self.requested_height() {
            params.push(("height", h.to_string()));
        }
        if let Some(Quality::Value(q)) = self.quality {
            params.push(("quality", q.to_string()));
        }
        let format = match self.format {
            None | Some(ImageFormat::Auto) => ImageFormat::Webp,
            Some(f) => f,
        };
        params.push(("format", format.as_str().to_string()));
        params
    }

    fn requested_width(&self) -> Option<u32> {
        self.width.filter(|w| *w > 0)
    }

    fn requested_height(&self) -> Option<u32> {
        self.height.filter(|h| *h > 0)
    }

    /// Parse a CDN transform string. Unknown tokens are rejected.
    pub fn parse_cdn_transformation(input: &str) -> Result<Self, AppError> {
        let mut options = TransformOptions::default();

        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (prefix, value) = token.split_once('_').ok_or_else(|| {
                AppError::InvalidInput(format!("Invalid transform token: {}", token))
            })?;

            match prefix {
                "c" => options.crop = value.parse()?,
                "g" => options.gravity = value.parse()?,
                "w" => options.width = Some(parse_dimension(token, value)?),
                "h" => options.height = Some(parse_dimension(token, value)?),
                "q" => options.quality = Some(value.parse()?),
                "f" => options.format = Some(value.parse()?),
                _ => {
                    return Err(AppError::InvalidInput(format!(
                        "Unsupported transform token: {}",
                        token
                    )))
                }
            }
        }

        Ok(options)
    }
}

fn parse_dimension(token: &str, value: &str) -> Result<u32, AppError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::InvalidInput(format!(
            "Invalid dimension in transform token: {}",
            token
        ))),
    }
}

//! Media attachment paths and image payload validation.
//!
//! Storage paths have the shape `uploads/recipe/{kind}/{random_id}.{ext}`.
//! The random id is supplied by the caller (a UUID v4 in production) so path
//! generation stays deterministic under test.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{ImageError, ImageFormat, ImageReader, Limits};
use uuid::Uuid;

/// Directory prefix shared by every recipe upload.
pub const RECIPE_UPLOAD_PREFIX: &str = "uploads/recipe";
/// Longest file extension carried into a storage path.
pub const MAX_EXTENSION_LEN: usize = 10;
/// Largest accepted width or height of an uploaded image, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 8192;
/// Decoder allocation ceiling for one upload.
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Formats that are accepted on upload and served back with their own
/// media type.
pub const SERVED_IMAGE_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Media folder chosen from the original file's media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Images,
    Videos,
}

impl MediaKind {
    /// Classify a file name by its extension's media type.
    pub fn for_filename(filename: &str) -> Self {
        let is_video = mime_guess::from_path(filename)
            .first()
            .is_some_and(|mime| mime.type_() == mime_guess::mime::VIDEO);
        if is_video { Self::Videos } else { Self::Images }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Videos => "videos",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the storage path for an uploaded file.
///
/// Extensions longer than [`MAX_EXTENSION_LEN`] or containing anything but
/// ASCII alphanumerics are dropped.
///
/// # Examples
/// ```
/// use backend::domain::generate_path;
///
/// assert_eq!(
///     generate_path("myimage.jpg", "test-uuid"),
///     "uploads/recipe/images/test-uuid.jpg",
/// );
/// assert_eq!(
///     generate_path("myvid.mp4", "test_vid_uuid"),
///     "uploads/recipe/videos/test_vid_uuid.mp4",
/// );
/// ```
pub fn generate_path(original_filename: &str, random_id: &str) -> String {
    let kind = MediaKind::for_filename(original_filename);
    let extension = plain_extension(original_filename);
    match extension {
        Some(ext) => format!("{RECIPE_UPLOAD_PREFIX}/{kind}/{random_id}.{ext}"),
        None => format!("{RECIPE_UPLOAD_PREFIX}/{kind}/{random_id}"),
    }
}

fn plain_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

/// Media type to serve a stored file with.
///
/// Only [`SERVED_IMAGE_FORMATS`] keep their own type; everything else is
/// `application/octet-stream`.
pub fn served_content_type(path: &str) -> &'static str {
    ImageFormat::from_path(path)
        .ok()
        .filter(|format| SERVED_IMAGE_FORMATS.contains(format))
        .map_or("application/octet-stream", |format| format.to_mime_type())
}

/// [`generate_path`] with a fresh UUID v4.
pub fn generate_random_path(original_filename: &str) -> String {
    generate_path(original_filename, &Uuid::new_v4().to_string())
}

/// Reasons an upload is refused before storage is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("no image was submitted")]
    Empty,
    #[error("upload a valid image; the file was either not an image or corrupted")]
    NotAnImage,
    #[error("image exceeds {max}x{max} pixels", max = MAX_IMAGE_DIMENSION)]
    TooLarge,
}

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    limits
}

/// Uploaded bytes that decoded successfully as an image.
///
/// ## Invariants
/// - `bytes` is a complete image in `format`, one of
///   [`SERVED_IMAGE_FORMATS`].
/// - `filename` always ends with an extension of `format`. A client
///   extension is kept only when it names that same format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    filename: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate an upload by sniffing and fully decoding it.
    ///
    /// Decoding is CPU bound; callers on an async executor should run this
    /// on a blocking thread.
    pub fn new(filename: Option<&str>, bytes: Vec<u8>) -> Result<Self, ImageValidationError> {
        if bytes.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        let format = image::guess_format(&bytes)
            .ok()
            .filter(|format| SERVED_IMAGE_FORMATS.contains(format))
            .ok_or(ImageValidationError::NotAnImage)?;
        let mut reader = ImageReader::with_format(Cursor::new(bytes.as_slice()), format);
        reader.limits(decode_limits());
        reader.decode().map_err(|err| match err {
            ImageError::Limits(_) => ImageValidationError::TooLarge,
            _ => ImageValidationError::NotAnImage,
        })?;

        let name = filename.map(str::trim).filter(|name| !name.is_empty());
        let stem = name
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .unwrap_or("image");
        let extension = name
            .and_then(plain_extension)
            .map(str::to_ascii_lowercase)
            .filter(|ext| ImageFormat::from_extension(ext) == Some(format))
            .unwrap_or_else(|| {
                format
                    .extensions_str()
                    .first()
                    .copied()
                    .unwrap_or("img")
                    .to_owned()
            });
        let filename = format!("{stem}.{extension}");
        Ok(Self {
            filename,
            format,
            bytes,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use rstest::rstest;

    fn png_bytes() -> Vec<u8> {
        let img = ImageBuffer::from_pixel(10, 10, Rgb([200_u8, 30, 30]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).expect("encode png");
        buf.into_inner()
    }

    #[rstest]
    #[case("myimage.jpg", "test-uuid", "uploads/recipe/images/test-uuid.jpg")]
    #[case("myvid.mp4", "test_vid_uuid", "uploads/recipe/videos/test_vid_uuid.mp4")]
    #[case("clip.MOV", "abc", "uploads/recipe/videos/abc.MOV")]
    #[case("photo.png", "abc", "uploads/recipe/images/abc.png")]
    #[case("noext", "abc", "uploads/recipe/images/abc")]
    #[case("photo.p-ng", "abc", "uploads/recipe/images/abc")]
    #[case("photo.abcdefghijk", "abc", "uploads/recipe/images/abc")]
    fn generated_paths_follow_layout(
        #[case] filename: &str,
        #[case] random_id: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(generate_path(filename, random_id), expected);
    }

    #[rstest]
    fn random_paths_differ() {
        let first = generate_random_path("a.jpg");
        let second = generate_random_path("a.jpg");
        assert_ne!(first, second);
        assert!(first.starts_with("uploads/recipe/images/"));
        assert!(first.ends_with(".jpg"));
    }

    #[rstest]
    fn png_upload_is_accepted() {
        let upload = ImageUpload::new(Some("dish.png"), png_bytes()).expect("valid image");
        assert_eq!(upload.format(), ImageFormat::Png);
        assert_eq!(upload.filename(), "dish.png");
    }

    #[rstest]
    #[case(None, "image.png")]
    #[case(Some("dish"), "dish.png")]
    #[case(Some("  "), "image.png")]
    fn missing_extensions_fall_back_to_detected_format(
        #[case] filename: Option<&str>,
        #[case] expected: &str,
    ) {
        let upload = ImageUpload::new(filename, png_bytes()).expect("valid image");
        assert_eq!(upload.filename(), expected);
    }

    #[rstest]
    #[case("x.html", "x.png")]
    #[case("x.svg", "x.png")]
    #[case("x.jpg", "x.png")]
    #[case("DISH.PNG", "DISH.png")]
    fn extensions_not_naming_the_decoded_format_are_replaced(
        #[case] filename: &str,
        #[case] expected: &str,
    ) {
        let upload = ImageUpload::new(Some(filename), png_bytes()).expect("valid image");
        assert_eq!(upload.filename(), expected);
        assert!(generate_path(upload.filename(), "id").ends_with("/id.png"));
    }

    #[rstest]
    fn overlong_extensions_fall_back_to_detected_format() {
        let filename = format!("photo.{}", "p".repeat(240));
        let upload = ImageUpload::new(Some(&filename), png_bytes()).expect("valid image");
        assert_eq!(upload.filename(), "photo.png");
        assert_eq!(generate_path(upload.filename(), "id"), "uploads/recipe/images/id.png");
    }

    #[rstest]
    fn oversized_dimensions_are_rejected() {
        let img = image::GrayImage::new(MAX_IMAGE_DIMENSION + 1, 1);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).expect("encode png");

        let err = ImageUpload::new(Some("wide.png"), buf.into_inner()).expect_err("too wide");
        assert_eq!(err, ImageValidationError::TooLarge);
    }

    #[rstest]
    #[case("uploads/recipe/images/a.png", "image/png")]
    #[case("uploads/recipe/images/a.JPG", "image/jpeg")]
    #[case("uploads/recipe/images/a.webp", "image/webp")]
    #[case("uploads/recipe/images/a.html", "application/octet-stream")]
    #[case("uploads/recipe/images/a.svg", "application/octet-stream")]
    #[case("uploads/recipe/videos/a.mp4", "application/octet-stream")]
    #[case("uploads/recipe/images/a", "application/octet-stream")]
    fn only_known_image_formats_keep_their_media_type(
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(served_content_type(path), expected);
    }

    #[rstest]
    fn non_image_bytes_are_rejected() {
        let err = ImageUpload::new(Some("x.jpg"), b"notimage".to_vec()).expect_err("not image");
        assert_eq!(err, ImageValidationError::NotAnImage);
    }

    #[rstest]
    fn truncated_image_is_rejected() {
        let mut bytes = png_bytes();
        bytes.truncate(20);
        let err = ImageUpload::new(Some("x.png"), bytes).expect_err("corrupt image");
        assert_eq!(err, ImageValidationError::NotAnImage);
    }

    #[rstest]
    fn empty_upload_is_rejected() {
        assert_eq!(
            ImageUpload::new(Some("x.png"), Vec::new()),
            Err(ImageValidationError::Empty)
        );
    }
}

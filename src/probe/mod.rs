/// Dimension probing module
///
/// This module discovers the native pixel size of every image:
/// - Fetching encoded bytes from disk or the network (fetch.rs)
/// - Decoding just enough of the header to read width/height
/// - Degrading to a square tile when anything goes wrong
///
/// Probes are independent futures; nothing here retries or times out.

pub mod fetch;

pub use fetch::{ImageFetcher, UrlFetcher};

use bytes::Bytes;
use futures::stream::{FuturesUnordered, Stream};
use futures::future::join_all;
use image::metadata::Orientation;
use image::{ImageDecoder, ImageReader};
use log::{debug, warn};
use std::future::Future;
use std::io::Cursor;
use std::sync::Arc;

use crate::error::ProbeError;
use crate::state::data::{ImageRecord, ImageRef};

/// Result of probing one image
#[derive(Debug, Clone)]
pub struct ProbeOutput {
    pub record: ImageRecord,
    /// The encoded image, kept so the presentation layer need not download it twice.
    /// None when the probe failed.
    pub data: Option<Bytes>,
}

impl ProbeOutput {
    pub fn failed(&self) -> bool {
        self.data.is_none()
    }
}

/// Discovers image dimensions concurrently
#[derive(Clone)]
pub struct DimensionProbe {
    fetcher: Arc<dyn ImageFetcher>,
}

impl DimensionProbe {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Probe backed by the default file/http fetcher
    pub fn with_url_fetcher(client: reqwest::Client) -> Self {
        Self::new(Arc::new(UrlFetcher::with_client(client)))
    }

    /// Probe a single image.
    ///
    /// Always resolves: a failed fetch or decode yields the square sentinel
    /// record and a warning in the log.
    pub fn probe_one(&self, reference: ImageRef) -> impl Future<Output = ProbeOutput> + Send + 'static {
        let fetcher = Arc::clone(&self.fetcher);

        async move {
            match measure(fetcher.as_ref(), &reference.url).await {
                Ok((width, height, data)) => {
                    debug!("Probed {}: {}x{}", reference.display_name, width, height);
                    ProbeOutput {
                        record: ImageRecord::measured(reference, width, height),
                        data: Some(data),
                    }
                }
                Err(err) => {
                    warn!(
                        "⚠️  Could not load image for dimension calculation: {} ({})",
                        reference.url, err
                    );
                    ProbeOutput {
                        record: ImageRecord::fallback(reference),
                        data: None,
                    }
                }
            }
        }
    }

    /// Probe every image concurrently and wait for all of them.
    ///
    /// Output has the same length and order as the input.
    pub async fn probe_all(&self, refs: Vec<ImageRef>) -> Vec<ProbeOutput> {
        join_all(refs.into_iter().map(|reference| self.probe_one(reference))).await
    }

    /// Probe every image concurrently, yielding `(input index, output)` as each resolves
    pub fn probe_each(&self, refs: Vec<ImageRef>) -> impl Stream<Item = (usize, ProbeOutput)> + Send + 'static {
        refs.into_iter()
            .enumerate()
            .map(|(index, reference)| {
                let probe = self.probe_one(reference);
                async move { (index, probe.await) }
            })
            .collect::<FuturesUnordered<_>>()
    }
}

impl std::fmt::Debug for DimensionProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionProbe").finish_non_exhaustive()
    }
}

/// Fetch the bytes and read the header dimensions
async fn measure(fetcher: &dyn ImageFetcher, url: &str) -> Result<(u32, u32, Bytes), ProbeError> {
    let data = fetcher.fetch(url).await?;

    // Header parsing is CPU work, keep it off the event loop
    let header = data.clone();
    let (width, height) = tokio::task::spawn_blocking(move || read_dimensions(&header))
        .await
        .map_err(|e| ProbeError::Join(e.to_string()))??;

    Ok((width, height, data))
}

/// Read width/height from encoded image bytes without decoding pixels.
///
/// The size is reported as displayed: an EXIF orientation that turns the
/// picture by a quarter swaps width and height.
pub fn read_dimensions(data: &[u8]) -> Result<(u32, u32), ProbeError> {
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_decoder()?;
    let (width, height) = decoder.dimensions();

    if width == 0 || height == 0 {
        return Err(ProbeError::EmptyDimensions);
    }

    // Unreadable metadata is not worth failing the probe over
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    if is_quarter_turn(orientation) {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}

fn is_quarter_turn(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use futures::{FutureExt, StreamExt};
    use image::{ImageFormat, RgbImage};
    use std::collections::HashMap;

    /// Serves encoded images from memory, fails for anything else
    struct MemoryFetcher {
        files: HashMap<String, Bytes>,
    }

    impl ImageFetcher for MemoryFetcher {
        fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Bytes, ProbeError>> {
            let found = self.files.get(url).cloned();
            let url = url.to_string();
            async move {
                found.ok_or_else(|| {
                    ProbeError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, url))
                })
            }
            .boxed()
        }
    }

    fn png(width: u32, height: u32) -> Bytes {
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        Bytes::from(buffer.into_inner())
    }

    fn memory_probe(files: &[(&str, Bytes)]) -> DimensionProbe {
        let files = files
            .iter()
            .map(|(name, data)| (name.to_string(), data.clone()))
            .collect();
        DimensionProbe::new(Arc::new(MemoryFetcher { files }))
    }

    /// Encode a JPEG and splice an EXIF APP1 segment carrying `orientation` right after SOI
    fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .unwrap();
        let jpeg = buffer.into_inner();

        // Little-endian TIFF with one IFD entry: Orientation (0x0112), SHORT, count 1
        let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x00];
        tiff.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
        tiff.extend_from_slice(&orientation.to_le_bytes());
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_exif_rotation_swaps_dimensions() {
        // 6 = rotate 90 clockwise, the usual portrait phone shot
        assert_eq!(read_dimensions(&jpeg_with_orientation(40, 20, 6)).unwrap(), (20, 40));
        assert_eq!(read_dimensions(&jpeg_with_orientation(40, 20, 8)).unwrap(), (20, 40));
        // 3 = upside down, 1 = as stored
        assert_eq!(read_dimensions(&jpeg_with_orientation(40, 20, 3)).unwrap(), (40, 20));
        assert_eq!(read_dimensions(&jpeg_with_orientation(40, 20, 1)).unwrap(), (40, 20));
    }

    #[tokio::test]
    async fn test_rotated_photo_is_portrait() {
        let probe = memory_probe(&[("portrait.jpg", Bytes::from(jpeg_with_orientation(40, 20, 6)))]);
        let output = probe.probe_one(ImageRef::new("portrait.jpg")).await;
        assert!((output.record.aspect_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_read_dimensions() {
        assert_eq!(read_dimensions(&png(40, 20)).unwrap(), (40, 20));
        assert!(read_dimensions(b"definitely not an image").is_err());
    }

    #[tokio::test]
    async fn test_one_failure_keeps_cardinality() {
        let probe = memory_probe(&[("a.png", png(30, 20)), ("c.png", png(10, 10))]);
        let refs = vec![
            ImageRef::new("a.png"),
            ImageRef::new("b.png"),
            ImageRef::new("c.png"),
        ];

        let outputs = probe.probe_all(refs).await;

        assert_eq!(outputs.len(), 3);
        assert!((outputs[0].record.aspect_ratio - 1.5).abs() < 1e-12);
        assert!(outputs[1].failed());
        assert_eq!(outputs[1].record.aspect_ratio, 1.0);
        assert_eq!(outputs[1].record.native_width, 100);
        assert_eq!(outputs[2].record.aspect_ratio, 1.0);
        assert!(!outputs[2].failed());
    }

    #[tokio::test]
    async fn test_corrupt_image_falls_back() {
        let probe = memory_probe(&[("bad.jpg", Bytes::from_static(b"\xff\xd8\xff garbage"))]);
        let output = probe.probe_one(ImageRef::new("bad.jpg")).await;
        assert!(output.failed());
        assert_eq!(output.record.aspect_ratio, 1.0);
    }

    #[tokio::test]
    async fn test_probe_each_reports_every_index() {
        let probe = memory_probe(&[("a.png", png(2, 1)), ("b.png", png(1, 2))]);
        let refs = vec![
            ImageRef::new("a.png"),
            ImageRef::new("b.png"),
            ImageRef::new("missing.png"),
        ];

        let mut seen: Vec<usize> = probe
            .probe_each(refs)
            .map(|(index, _)| index)
            .collect()
            .await;
        seen.sort();

        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_probe_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landscape.png");
        RgbImage::new(64, 48).save(&path).unwrap();

        let probe = DimensionProbe::with_url_fetcher(reqwest::Client::new());
        let file_url = url::Url::from_file_path(&path).unwrap().to_string();

        let by_url = probe.probe_one(ImageRef::new(file_url)).await;
        let by_path = probe
            .probe_one(ImageRef::new(path.to_string_lossy().to_string()))
            .await;

        assert_eq!((by_url.record.native_width, by_url.record.native_height), (64, 48));
        assert_eq!(by_path.record.native_width, 64);
        assert_eq!(by_url.record.reference.display_name, "landscape.png");
    }
}

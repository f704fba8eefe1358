//! # Output Module
//!
//! Turns traced samples into images and hands them to the outside world:
//! - Buffer assembly from the lazy [`PixelSample`] stream
//! - PNG export with 8-bit channel clamping
//! - EXR export of the unclamped values, rescaled to linear [0, 1]
//! - Real-time visualization via TEV (The EXR Viewer)
//!
//! Colours arrive on the 0..255 scale and may exceed it where reflections and
//! diffuse light add up. Only the encoders here clamp.

use std::net::TcpStream;
use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};
use thiserror::Error;

use crate::frame::Frame;
use crate::interval::Interval;
use crate::tracer::PixelSample;

/// Traced frame with unclamped channels on the 0..255 scale.
pub type HdrImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Name under which renders appear in TEV.
const TEV_IMAGE_NAME: &str = "mirrortrace_output";

/// Failures while encoding or delivering an image.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output path has an extension no encoder handles.
    #[error("unsupported output format '{0}', only .png and .exr are supported")]
    UnsupportedFormat(String),

    /// PNG encoding or writing failed.
    #[error("failed to write PNG: {0}")]
    Png(#[from] image::ImageError),

    /// EXR encoding or writing failed.
    #[error("failed to write EXR: {0}")]
    Exr(#[from] exr::error::Error),

    /// Talking to TEV failed.
    #[error("TEV connection error: {0}")]
    Tev(#[from] std::io::Error),
}

/// Collect a sample stream into an image buffer.
///
/// Each sample lands at the pixel given by [`Frame::to_pixel`]; samples with
/// no colour stay black. Samples outside the frame are dropped.
pub fn assemble<I>(samples: I, frame: Frame) -> HdrImage
where
    I: IntoIterator<Item = PixelSample>,
{
    let mut image: HdrImage = ImageBuffer::new(frame.width, frame.height);
    for sample in samples {
        let Some((px, py)) = frame.to_pixel(sample.x, sample.y) else {
            debug!("Dropping sample ({}, {}) outside the frame", sample.x, sample.y);
            continue;
        };
        if let Some(color) = sample.color {
            image.put_pixel(px, py, Rgb([color.x, color.y, color.z]));
        }
    }
    image
}

/// Clamp every channel to [0, 255] and truncate to 8 bits.
pub fn to_rgb8(image: &HdrImage) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let (width, height) = image.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb(pixel.0.map(|channel| Interval::CHANNEL.clamp(channel) as u8))
    })
}

/// Save a traced image, choosing the encoder from the file extension.
///
/// `.png` writes clamped 8-bit RGB, `.exr` writes linear floats. Any other
/// extension is rejected before anything is written.
pub fn save_image(image: &HdrImage, output_path: &Path) -> Result<(), OutputError> {
    let extension = output_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => save_image_as_png(image, output_path),
        "exr" => save_image_as_exr(image, output_path),
        _ => Err(OutputError::UnsupportedFormat(extension)),
    }
}

/// Save a traced image as an 8-bit PNG.
///
/// Channel values are clamped to [0, 255] and truncated; no gamma curve is
/// applied because the tracer already works in display intensities. The
/// image is fully opaque RGB.
pub fn save_image_as_png(image: &HdrImage, output_path: &Path) -> Result<(), OutputError> {
    to_rgb8(image).save(output_path)?;
    info!("Image saved as {}", output_path.display());
    Ok(())
}

/// Save a traced image as EXR with full precision.
///
/// Values are divided by 255 so that a fully lit channel maps to 1.0, and
/// overexposed channels stay above 1.0 instead of being clipped.
pub fn save_image_as_exr(image: &HdrImage, output_path: &Path) -> Result<(), OutputError> {
    let (width, height) = image.dimensions();
    write_rgb_file(output_path, width as usize, height as usize, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0] / 255.0, pixel[1] / 255.0, pixel[2] / 255.0)
    })?;
    info!("HDR image saved as EXR: {}", output_path.display());
    Ok(())
}

/// Add TEV's default port when `address` names only a host.
pub fn tev_socket_address(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:14158", address)
    }
}

/// Send a traced image to TEV for real-time visualization.
///
/// Connects over TCP, creates an RGB image and uploads the pixels in TEV's
/// planar layout (all R values, then G, then B), scaled to [0, 1] like the EXR
/// output.
pub fn send_image_to_tev(image: &HdrImage, tev_address: &str) -> Result<(), OutputError> {
    let tev_address = tev_socket_address(tev_address);
    let (width, height) = image.dimensions();

    debug!("Attempting to connect to TEV at {}", tev_address);
    let stream = TcpStream::connect(&tev_address)?;
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    client.send(PacketCreateImage {
        image_name: TEV_IMAGE_NAME,
        width,
        height,
        channel_names: &["R", "G", "B"],
        grab_focus: true,
    })?;
    debug!("Image created in TEV successfully");

    let pixel_count = (width * height) as u64;
    let planar: Vec<f32> = (0..3)
        .flat_map(|channel| image.pixels().map(move |pixel| pixel[channel] / 255.0))
        .collect();

    let start_time = std::time::Instant::now();
    client.send(PacketUpdateImage {
        image_name: TEV_IMAGE_NAME,
        grab_focus: false,
        channel_names: &["R", "G", "B"],
        x: 0,
        y: 0,
        width,
        height,
        channel_offsets: &[0, pixel_count, 2 * pixel_count],
        channel_strides: &[1, 1, 1],
        data: &planar,
    })?;
    info!("Image data sent to TEV at {} in {:.2?}", tev_address, start_time.elapsed());
    Ok(())
}

/// Send to TEV, downgrading failures to a warning.
///
/// The viewer is optional, so a missing TEV never aborts a render.
pub fn try_send_image_to_tev(image: &HdrImage, tev_address: &str) {
    if let Err(e) = send_image_to_tev(image, tev_address) {
        warn!("Failed to send image to TEV at {}: {}", tev_address, e);
    }
}

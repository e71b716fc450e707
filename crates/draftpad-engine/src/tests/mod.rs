//! Shared helpers for unit tests.

use std::io::Cursor;

use crate::host::{NotificationKind, Notifier};

/// Encode a solid `width`×`height` PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Png)
}

pub fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut buffer = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), format)
        .unwrap();
    buffer
}

/// Notifier that keeps everything it was asked to show
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub shown: Vec<(String, NotificationKind)>,
}

impl RecordingNotifier {
    pub fn last_kind(&self) -> Option<NotificationKind> {
        self.shown.last().map(|(_, kind)| *kind)
    }
}

impl Notifier for RecordingNotifier {
    fn show(&mut self, message: &str, kind: NotificationKind) {
        self.shown.push((message.to_string(), kind));
    }
}

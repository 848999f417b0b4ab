// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photo selection and file downloads from Telegram servers.

use saucebot_core::SauceError;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, PhotoSize};
use tracing::debug;

/// Downloads a file by id.
///
/// Uses the Bot API's `getFile` to resolve the file path, then downloads
/// the file content as bytes.
pub async fn download_file(bot: &Bot, file_id: &str) -> Result<Vec<u8>, SauceError> {
    let file = bot
        .get_file(FileId(file_id.to_string()))
        .await
        .map_err(|e| SauceError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| SauceError::Channel {
            message: format!("failed to download file: {e}"),
            source: Some(Box::new(e)),
        })?;

    debug!(file_id, size = buf.len(), "downloaded file from Telegram");
    Ok(buf)
}

/// The largest variant of a photo by pixel count.
///
/// Telegram usually lists sizes smallest first; ties keep the later entry.
pub fn largest_photo(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(id: &str, width: u32, height: u32) -> PhotoSize {
        serde_json::from_value(serde_json::json!({
            "file_id": id,
            "file_unique_id": format!("u-{id}"),
            "width": width,
            "height": height,
            "file_size": 1000
        }))
        .unwrap()
    }

    #[test]
    fn picks_largest_by_area() {
        let sizes = vec![size("small", 90, 90), size("big", 1280, 960), size("mid", 320, 240)];
        assert_eq!(largest_photo(&sizes).unwrap().file.id.0, "big");
    }

    #[test]
    fn empty_has_no_largest() {
        assert!(largest_photo(&[]).is_none());
    }
}

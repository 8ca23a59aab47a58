use super::options::{CompressionMode, SessionOptions};
use crate::draw::{Color, Layer};
use crate::input::InputState;
use crate::util::Point;
use anyhow::{Context, Result};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const CURRENT_VERSION: u32 = 1;

/// Captured board state suitable for serialisation or restoration.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    /// PNG-encoded persistent layer.
    pub raster_png: Vec<u8>,
    pub anchors: Vec<Point>,
    pub tool_state: Option<ToolStateSnapshot>,
}

/// Subset of the tool settings persisted alongside the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStateSnapshot {
    pub line_color: Color,
    pub line_width: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    last_modified: String,
    width: i32,
    height: i32,
    raster_png: Vec<u8>,
    #[serde(default)]
    anchors: Vec<Point>,
    #[serde(default)]
    tool_state: Option<ToolStateSnapshot>,
}

pub struct LoadedSnapshot {
    pub snapshot: BoardSnapshot,
    pub compressed: bool,
}

/// Capture a snapshot of the current board.
pub fn snapshot_from_state(input: &InputState) -> Result<BoardSnapshot> {
    let raster_png = input
        .compositor()
        .main()
        .to_png_bytes()
        .context("failed to encode board raster")?;
    Ok(BoardSnapshot {
        width: input.compositor().width(),
        height: input.compositor().height(),
        raster_png,
        anchors: input.snap().to_vec(),
        tool_state: Some(ToolStateSnapshot {
            line_color: input.settings().line_color,
            line_width: input.settings().line_width,
        }),
    })
}

/// Persist the provided snapshot to disk according to the configured options.
pub fn save_snapshot(snapshot: &BoardSnapshot, options: &SessionOptions) -> Result<()> {
    fs::create_dir_all(&options.base_dir).with_context(|| {
        format!(
            "failed to create session directory {}",
            options.base_dir.display()
        )
    })?;

    let lock_path = options.lock_file_path();
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(&lock_path)
        .with_context(|| format!("failed to open session lock file {}", lock_path.display()))?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock session file {}", lock_path.display()))?;

    let result = save_snapshot_inner(snapshot, options);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!(
            "failed to unlock session file {}: {}",
            lock_path.display(),
            err
        )
    });

    result
}

fn save_snapshot_inner(snapshot: &BoardSnapshot, options: &SessionOptions) -> Result<()> {
    let session_path = options.session_file_path();
    let backup_path = options.backup_file_path();

    let file_payload = SessionFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        width: snapshot.width,
        height: snapshot.height,
        raster_png: snapshot.raster_png.clone(),
        anchors: snapshot.anchors.clone(),
        tool_state: snapshot.tool_state.clone(),
    };

    let mut payload_bytes =
        serde_json::to_vec(&file_payload).context("failed to serialise session payload")?;

    if payload_bytes.len() as u64 > options.max_file_size_bytes {
        warn!(
            "session data size {} bytes exceeds the configured limit of {} bytes; skipping save",
            payload_bytes.len(),
            options.max_file_size_bytes
        );
        return Ok(());
    }

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => {
            (payload_bytes.len() as u64) >= options.auto_compress_threshold_bytes
        }
    };

    if should_compress {
        payload_bytes = compress_bytes(&payload_bytes)?;
    }

    let tmp_path = temp_path(&session_path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!(
                    "failed to open temporary session file {}",
                    tmp_path.display()
                )
            })?;
        tmp_file
            .write_all(&payload_bytes)
            .context("failed to write session payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary session file")?;
    }

    if session_path.exists() {
        if options.backup_retention > 0 {
            if backup_path.exists() {
                fs::remove_file(&backup_path).ok();
            }
            fs::rename(&session_path, &backup_path).with_context(|| {
                format!(
                    "failed to rotate previous session file {} -> {}",
                    session_path.display(),
                    backup_path.display()
                )
            })?;
        } else {
            fs::remove_file(&session_path).ok();
        }
    }

    fs::rename(&tmp_path, &session_path).with_context(|| {
        format!(
            "failed to move temporary session file {} -> {}",
            tmp_path.display(),
            session_path.display()
        )
    })?;

    info!(
        "session saved to {} ({} bytes, compression={})",
        session_path.display(),
        payload_bytes.len(),
        should_compress
    );

    Ok(())
}

/// Attempt to load a previously saved session.
pub fn load_snapshot(options: &SessionOptions) -> Result<Option<BoardSnapshot>> {
    let session_path = options.session_file_path();
    if !session_path.exists() {
        debug!(
            "no session file present at {}, skipping load",
            session_path.display()
        );
        return Ok(None);
    }

    let metadata = fs::metadata(&session_path)
        .with_context(|| format!("failed to stat session file {}", session_path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "session file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            session_path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        return Ok(None);
    }

    let lock_path = options.lock_file_path();
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(&lock_path)
        .with_context(|| format!("failed to open session lock file {}", lock_path.display()))?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

    let result = load_snapshot_inner(&session_path);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!(
            "failed to unlock session file {}: {}",
            lock_path.display(),
            err
        )
    });

    match result? {
        Some(loaded) => Ok(Some(loaded.snapshot)),
        None => Ok(None),
    }
}

pub(crate) fn load_snapshot_inner(session_path: &Path) -> Result<Option<LoadedSnapshot>> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(session_path)
            .with_context(|| format!("failed to open session file {}", session_path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read session file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress session file")?;
        out
    } else {
        file_bytes
    };

    let session_file: SessionFile =
        serde_json::from_slice(&decompressed).context("failed to parse session json")?;

    if session_file.version > CURRENT_VERSION {
        warn!(
            "session file {} has version {} which is newer than supported version {}; refusing to load",
            session_path.display(),
            session_file.version,
            CURRENT_VERSION
        );
        return Ok(None);
    }

    if session_file.raster_png.is_empty() {
        debug!(
            "loaded session file at {} but it contained no raster data",
            session_path.display()
        );
        return Ok(None);
    }

    Ok(Some(LoadedSnapshot {
        snapshot: BoardSnapshot {
            width: session_file.width,
            height: session_file.height,
            raster_png: session_file.raster_png,
            anchors: session_file.anchors,
            tool_state: session_file.tool_state,
        },
        compressed,
    }))
}

/// Apply a loaded snapshot to the live [`InputState`].
///
/// History is reset by the load; see [`InputState::load_layer`]. A dimension
/// mismatch between the saved raster and the live surface is tolerated: the
/// raster is painted at the origin and cropped or padded as needed.
pub fn apply_snapshot(input: &mut InputState, snapshot: BoardSnapshot) -> Result<()> {
    let decoded =
        Layer::from_png_bytes(&snapshot.raster_png).context("failed to decode board raster")?;
    if decoded.width() != input.compositor().width()
        || decoded.height() != input.compositor().height()
    {
        warn!(
            "restored raster is {}x{} but the surface is {}x{}; painting at the origin",
            decoded.width(),
            decoded.height(),
            input.compositor().width(),
            input.compositor().height()
        );
    }
    input
        .load_layer(&decoded, snapshot.anchors)
        .context("failed to apply restored board")?;

    if let Some(tool_state) = snapshot.tool_state {
        input.set_line_color(tool_state.line_color);
        input
            .set_line_width(tool_state.line_width.clamp(0.5, 100.0))
            .context("failed to restore tool state")?;
    }
    Ok(())
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress session payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed session payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}

//! Builders for synthetic note archives.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use rusqlite::Connection;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Protobuf message under construction.
#[derive(Debug, Clone, Default)]
pub struct Msg(Vec<u8>);

impl Msg {
    pub fn new() -> Self {
        Self::default()
    }

    fn varint(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.0.push((v as u8) | 0x80);
            v >>= 7;
        }
        self.0.push(v as u8);
    }

    fn key(&mut self, field: u32, wire_type: u8) {
        self.varint((u64::from(field) << 3) | u64::from(wire_type));
    }

    pub fn uint(mut self, field: u32, v: u64) -> Self {
        self.key(field, 0);
        self.varint(v);
        self
    }

    pub fn int(self, field: u32, v: i32) -> Self {
        self.uint(field, i64::from(v) as u64)
    }

    pub fn boolean(self, field: u32, v: bool) -> Self {
        self.uint(field, u64::from(v))
    }

    pub fn float(mut self, field: u32, v: f32) -> Self {
        self.key(field, 5);
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(mut self, field: u32, data: &[u8]) -> Self {
        self.key(field, 2);
        self.varint(data.len() as u64);
        self.0.extend_from_slice(data);
        self
    }

    pub fn string(self, field: u32, s: &str) -> Self {
        self.bytes(field, s.as_bytes())
    }

    pub fn message(self, field: u32, msg: Msg) -> Self {
        self.bytes(field, &msg.0)
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

pub const BG_BLANK: i32 = 1;
pub const BG_RULED: i32 = 2;
pub const BG_PDF: i32 = 4;

pub const ST_NORMAL: i32 = 1;
pub const ST_HIGHLIGHT: i32 = 2;
pub const ST_LINE: i32 = 3;

pub fn background(kind: i32, width: f32, height: f32, color: u32) -> Msg {
    Msg::new()
        .int(1, kind)
        .float(2, width)
        .float(3, height)
        .uint(4, u64::from(color))
}

pub fn pdf_background(page_number: i32, width: f32, height: f32) -> Msg {
    background(BG_PDF, width, height, 0xffffffff).message(5, Msg::new().int(1, page_number))
}

/// Stroke item; `deltas` are `(dx, dy, weight)`.
pub fn stroke(kind: i32, color: u32, weight: f32, start: (f32, f32), deltas: &[(f32, f32, f32)]) -> Msg {
    let mut s = Msg::new()
        .int(1, kind)
        .uint(2, u64::from(color))
        .float(3, weight)
        .message(4, Msg::new().float(1, start.0).float(2, start.1));
    for &(dx, dy, w) in deltas {
        s = s.message(5, Msg::new().float(1, dx).float(2, dy).float(3, w));
    }
    Msg::new().int(1, 1).message(2, s)
}

/// Image item with bounds in centimetres and crop in pixels.
pub fn image_item(image_ref: &str, bounds: [f32; 4], crop: [i32; 4], rotation: i32) -> Msg {
    let rect = Msg::new()
        .float(1, bounds[0])
        .float(2, bounds[1])
        .float(3, bounds[2])
        .float(4, bounds[3]);
    let crop = Msg::new()
        .int(1, crop[0])
        .int(2, crop[1])
        .int(3, crop[2])
        .int(4, crop[3]);
    let image = Msg::new()
        .message(1, rect)
        .message(2, crop)
        .string(3, image_ref)
        .int(6, rotation);
    Msg::new().int(1, 4).message(5, image)
}

/// Item of a kind carrying no payload (shape, text).
pub fn bare_item(kind: i32) -> Msg {
    Msg::new().int(1, kind)
}

pub fn layer(items: Vec<Msg>) -> Msg {
    items
        .into_iter()
        .fold(Msg::new(), |layer, item| layer.message(1, item))
}

pub fn page(background: Msg, layers: Vec<Msg>) -> Vec<u8> {
    layers
        .into_iter()
        .fold(Msg::new().message(1, background), |page, l| page.message(2, l))
        .build()
}

/// A solid RGBA PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

struct PageRow {
    id: String,
    page_num: i64,
    document_id: Option<String>,
    record: Option<Vec<u8>>,
}

/// Assembles a note archive on disk.
#[derive(Default)]
pub struct NoteBuilder {
    pages: Vec<PageRow>,
    entries: Vec<(String, Vec<u8>)>,
    with_database: bool,
}

impl NoteBuilder {
    pub fn new() -> Self {
        Self {
            with_database: true,
            ..Default::default()
        }
    }

    /// Add a page row and its record.
    pub fn page(mut self, id: &str, page_num: i64, document_id: Option<&str>, record: Vec<u8>) -> Self {
        self.pages.push(PageRow {
            id: id.to_string(),
            page_num,
            document_id: document_id.map(str::to_string),
            record: Some(record),
        });
        self
    }

    /// Add a page row whose record entry is missing.
    pub fn page_without_record(mut self, id: &str, page_num: i64) -> Self {
        self.pages.push(PageRow {
            id: id.to_string(),
            page_num,
            document_id: None,
            record: None,
        });
        self
    }

    pub fn document(mut self, id: &str, data: &[u8]) -> Self {
        self.entries.push((format!("data/docs/{}", id), data.to_vec()));
        self
    }

    pub fn image(mut self, image_ref: &str, data: Vec<u8>) -> Self {
        self.entries.push((format!("data/imgs/{}", image_ref), data));
        self
    }

    pub fn without_database(mut self) -> Self {
        self.with_database = false;
        self
    }

    /// Write the archive as `dir/name` and return its path.
    pub fn write(self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        if self.with_database {
            let db = database(&self.pages, dir);
            zip.start_file("note.db", options).unwrap();
            zip.write_all(&db).unwrap();
        }
        for row in &self.pages {
            if let Some(record) = &row.record {
                zip.start_file(format!("data/pages/{}.page", row.id), options)
                    .unwrap();
                zip.write_all(record).unwrap();
            }
        }
        for (name, data) in &self.entries {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        path
    }
}

fn database(rows: &[PageRow], scratch: &Path) -> Vec<u8> {
    let db_dir = tempfile::tempdir_in(scratch).unwrap();
    let db_path = db_dir.path().join("note.db");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute(
            "CREATE TABLE page (id TEXT PRIMARY KEY, pageNum INTEGER, documentId TEXT)",
            [],
        )
        .unwrap();
        for row in rows {
            conn.execute(
                "INSERT INTO page (id, pageNum, documentId) VALUES (?1, ?2, ?3)",
                rusqlite::params![row.id, row.page_num, row.document_id],
            )
            .unwrap();
        }
    }
    std::fs::read(&db_path).unwrap()
}

/// Names of the files in `dir`, sorted.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

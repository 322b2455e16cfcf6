//! Page record decoding.
//!
//! Field numbers follow the Squid page schema:
//!
//! ```text
//! Page       { 1 background, 2 repeated layer }
//! Background { 1 type, 2 width, 3 height, 4 colour, 5 pdf { 1 page_number } }
//! Layer      { 1 repeated item }
//! Item       { 1 type, 2 stroke, 5 image }
//! Stroke     { 1 type, 2 colour, 3 weight, 4 start, 5 repeated delta }
//! Point      { 1 x, 2 y }
//! Delta      { 1 dx, 2 dy, 3 weight }
//! Image      { 1 bounds, 2 crop_bounds, 3 image_hash, 4 flip_x, 5 flip_y, 6 rotation }
//! Rect       { 1 left, 2 top, 3 right, 4 bottom }
//! ```
//!
//! Unknown fields are skipped; absent fields keep their zero defaults.

use super::page::{
    Background, BackgroundKind, CropRect, DecodedPage, Delta, ImageItem, Item, Layer, Point,
    Rect, Stroke, StrokeKind,
};
use super::wire::{WireError, WireReader};

type Result<T> = std::result::Result<T, WireError>;

/// Decode a full page record.
pub fn decode_page(buf: &[u8]) -> Result<DecodedPage> {
    let mut page = DecodedPage::default();
    let mut reader = WireReader::new("Page", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => page.background = decode_background(field.as_bytes()?)?,
            2 => page.add_layer(decode_layer(field.as_bytes()?)?),
            _ => {}
        }
    }
    Ok(page)
}

fn decode_background(buf: &[u8]) -> Result<Background> {
    let mut code = 0;
    let mut page_number = 0;
    let mut background = Background::default();

    let mut reader = WireReader::new("Background", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => code = field.as_i32()?,
            2 => background.width = field.as_f32()?,
            3 => background.height = field.as_f32()?,
            4 => background.color = field.as_u32()?,
            5 => page_number = decode_pdf_info(field.as_bytes()?)?,
            _ => {}
        }
    }

    background.kind = BackgroundKind::from_code(code, page_number);
    Ok(background)
}

fn decode_pdf_info(buf: &[u8]) -> Result<i32> {
    let mut page_number = 0;
    let mut reader = WireReader::new("PdfInfo", buf);
    while let Some(field) = reader.next_field()? {
        if field.number == 1 {
            page_number = field.as_i32()?;
        }
    }
    Ok(page_number)
}

fn decode_layer(buf: &[u8]) -> Result<Layer> {
    let mut layer = Layer::default();
    let mut reader = WireReader::new("Layer", buf);
    while let Some(field) = reader.next_field()? {
        if field.number == 1 {
            layer.items.push(decode_item(field.as_bytes()?)?);
        }
    }
    Ok(layer)
}

fn decode_item(buf: &[u8]) -> Result<Item> {
    let mut code = 0;
    let mut stroke = None;
    let mut image = None;

    let mut reader = WireReader::new("Item", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => code = field.as_i32()?,
            2 => stroke = Some(decode_stroke(field.as_bytes()?)?),
            5 => image = Some(decode_image(field.as_bytes()?)?),
            _ => {}
        }
    }

    Ok(match code {
        0 => Item::Undefined,
        1 => Item::Stroke(stroke.unwrap_or_default()),
        2 => Item::Shape,
        3 => Item::Text,
        4 => Item::Image(image.unwrap_or_default()),
        code => Item::Unknown { code },
    })
}

fn decode_stroke(buf: &[u8]) -> Result<Stroke> {
    let mut stroke = Stroke::default();
    let mut reader = WireReader::new("Stroke", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => stroke.kind = StrokeKind::from_code(field.as_i32()?),
            2 => stroke.color = field.as_u32()?,
            3 => stroke.weight = field.as_f32()?,
            4 => stroke.start = decode_point(field.as_bytes()?)?,
            5 => stroke.deltas.push(decode_delta(field.as_bytes()?)?),
            _ => {}
        }
    }
    Ok(stroke)
}

fn decode_point(buf: &[u8]) -> Result<Point> {
    let mut point = Point::default();
    let mut reader = WireReader::new("Point", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => point.x = field.as_f32()?,
            2 => point.y = field.as_f32()?,
            _ => {}
        }
    }
    Ok(point)
}

fn decode_delta(buf: &[u8]) -> Result<Delta> {
    let mut delta = Delta::default();
    let mut reader = WireReader::new("Delta", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => delta.dx = field.as_f32()?,
            2 => delta.dy = field.as_f32()?,
            3 => delta.weight = field.as_f32()?,
            _ => {}
        }
    }
    Ok(delta)
}

fn decode_image(buf: &[u8]) -> Result<ImageItem> {
    let mut image = ImageItem::default();
    let mut reader = WireReader::new("Image", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => image.bounds = decode_rect(field.as_bytes()?)?,
            2 => image.crop_bounds = decode_crop_rect(field.as_bytes()?)?,
            3 => image.image_ref = field.as_str()?.to_string(),
            4 => image.flip_x = field.as_bool()?,
            5 => image.flip_y = field.as_bool()?,
            6 => image.rotation = field.as_i32()?,
            _ => {}
        }
    }
    Ok(image)
}

fn decode_rect(buf: &[u8]) -> Result<Rect> {
    let mut rect = Rect::default();
    let mut reader = WireReader::new("Rect", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => rect.left = field.as_f32()?,
            2 => rect.top = field.as_f32()?,
            3 => rect.right = field.as_f32()?,
            4 => rect.bottom = field.as_f32()?,
            _ => {}
        }
    }
    Ok(rect)
}

fn decode_crop_rect(buf: &[u8]) -> Result<CropRect> {
    let mut rect = CropRect::default();
    let mut reader = WireReader::new("CropRect", buf);
    while let Some(field) = reader.next_field()? {
        match field.number {
            1 => rect.left = field.as_i32()?,
            2 => rect.top = field.as_i32()?,
            3 => rect.right = field.as_i32()?,
            4 => rect.bottom = field.as_i32()?,
            _ => {}
        }
    }
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::super::wire::encode;
    use super::*;

    fn background(kind: i32, w: f32, h: f32, colour: u32, pdf_page: Option<i32>) -> Vec<u8> {
        let mut bg = Vec::new();
        encode::int(&mut bg, 1, kind);
        encode::float(&mut bg, 2, w);
        encode::float(&mut bg, 3, h);
        encode::uint(&mut bg, 4, u64::from(colour));
        if let Some(n) = pdf_page {
            let mut pdf = Vec::new();
            encode::int(&mut pdf, 1, n);
            encode::bytes(&mut bg, 5, &pdf);
        }
        bg
    }

    fn stroke_item(kind: i32) -> Vec<u8> {
        let mut start = Vec::new();
        encode::float(&mut start, 1, 1.0);
        encode::float(&mut start, 2, 2.0);

        let mut stroke = Vec::new();
        encode::int(&mut stroke, 1, kind);
        encode::uint(&mut stroke, 2, 0xff0000ff);
        encode::float(&mut stroke, 3, 0.5);
        encode::bytes(&mut stroke, 4, &start);
        for (dx, dy, w) in [(0.1f32, 0.2f32, 0.6f32), (0.3, -0.4, 0.7)] {
            let mut delta = Vec::new();
            encode::float(&mut delta, 1, dx);
            encode::float(&mut delta, 2, dy);
            encode::float(&mut delta, 3, w);
            encode::bytes(&mut stroke, 5, &delta);
        }

        let mut item = Vec::new();
        encode::int(&mut item, 1, 1);
        encode::bytes(&mut item, 2, &stroke);
        item
    }

    fn image_item() -> Vec<u8> {
        let mut bounds = Vec::new();
        for (n, v) in [(1, 1.0f32), (2, 2.0), (3, 5.0), (4, 6.0)] {
            encode::float(&mut bounds, n, v);
        }
        let mut crop = Vec::new();
        for (n, v) in [(1, 10), (2, 20), (3, 110), (4, 220)] {
            encode::int(&mut crop, n, v);
        }
        let mut image = Vec::new();
        encode::bytes(&mut image, 1, &bounds);
        encode::bytes(&mut image, 2, &crop);
        encode::bytes(&mut image, 3, b"abc123");
        encode::uint(&mut image, 4, 1);
        encode::int(&mut image, 6, 270);

        let mut item = Vec::new();
        encode::int(&mut item, 1, 4);
        encode::bytes(&mut item, 5, &image);
        item
    }

    #[test]
    fn test_empty_record_is_default_page() {
        let page = decode_page(&[]).unwrap();
        assert_eq!(page.background.kind, BackgroundKind::Undefined);
        assert!(page.layers.is_empty());
    }

    #[test]
    fn test_decode_background() {
        let mut buf = Vec::new();
        encode::bytes(&mut buf, 1, &background(1, 21.0, 29.7, 0xffffffff, None));
        let page = decode_page(&buf).unwrap();
        assert_eq!(page.background.kind, BackgroundKind::Blank);
        assert_eq!(page.background.width, 21.0);
        assert_eq!(page.background.height, 29.7);
        assert_eq!(page.background.color, 0xffffffff);
    }

    #[test]
    fn test_decode_pdf_background() {
        let mut buf = Vec::new();
        encode::bytes(&mut buf, 1, &background(4, 10.0, 20.0, 0, Some(3)));
        let page = decode_page(&buf).unwrap();
        assert_eq!(page.background.kind, BackgroundKind::Pdf { page_number: 3 });
    }

    #[test]
    fn test_decode_layers_and_items() {
        let mut layer = Vec::new();
        encode::bytes(&mut layer, 1, &stroke_item(1));
        encode::bytes(&mut layer, 1, &image_item());
        let mut shape = Vec::new();
        encode::int(&mut shape, 1, 2);
        encode::bytes(&mut layer, 1, &shape);
        let mut unknown = Vec::new();
        encode::int(&mut unknown, 1, 17);
        encode::bytes(&mut layer, 1, &unknown);

        let mut buf = Vec::new();
        encode::bytes(&mut buf, 2, &layer);
        encode::bytes(&mut buf, 2, &[]);

        let page = decode_page(&buf).unwrap();
        assert_eq!(page.layers.len(), 2);
        assert_eq!(page.item_count(), 4);

        let items = &page.layers[0].items;
        match &items[0] {
            Item::Stroke(s) => {
                assert_eq!(s.kind, StrokeKind::Normal);
                assert_eq!(s.color, 0xff0000ff);
                assert_eq!(s.weight, 0.5);
                assert_eq!(s.start, Point::new(1.0, 2.0));
                assert_eq!(s.deltas.len(), 2);
                assert_eq!(s.deltas[1], Delta::new(0.3, -0.4, 0.7));
                assert_eq!(s.point_count(), 3);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
        match &items[1] {
            Item::Image(img) => {
                assert_eq!(img.bounds, Rect::new(1.0, 2.0, 5.0, 6.0));
                assert_eq!(img.crop_bounds, CropRect::new(10, 20, 110, 220));
                assert_eq!(img.image_ref, "abc123");
                assert!(img.flip_x);
                assert!(!img.flip_y);
                assert_eq!(img.rotation, 270);
            }
            other => panic!("expected image, got {:?}", other),
        }
        assert_eq!(items[2], Item::Shape);
        assert_eq!(items[3], Item::Unknown { code: 17 });
    }

    #[test]
    fn test_unknown_fields_skipped() {
        let mut buf = Vec::new();
        encode::uint(&mut buf, 99, 12345);
        encode::bytes(&mut buf, 1, &background(1, 1.0, 1.0, 0, None));
        encode::float(&mut buf, 77, 3.0);
        let page = decode_page(&buf).unwrap();
        assert_eq!(page.background.kind, BackgroundKind::Blank);
    }

    #[test]
    fn test_wrong_wire_type_is_error() {
        // Background sent as a varint instead of a message.
        let mut buf = Vec::new();
        encode::uint(&mut buf, 1, 5);
        assert!(matches!(
            decode_page(&buf),
            Err(WireError::WireTypeMismatch { message: "Page", field: 1, .. })
        ));
    }

    #[test]
    fn test_truncated_nested_message() {
        let mut buf = Vec::new();
        encode::bytes(&mut buf, 1, &background(1, 1.0, 1.0, 0, None));
        buf.truncate(buf.len() - 2);
        assert!(decode_page(&buf).is_err());
    }
}

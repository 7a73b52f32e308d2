use favicon::icondir;
use favicon::payload;
use favicon::{Bitmap, Error, IconFile, RgbaBuffer};
use std::io::{self, Cursor, Write};

//===========================================================================//

fn patterned(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::new();
    for index in 0..(width * height) {
        rgba.push((index % 251) as u8);
        rgba.push((index / 7 % 256) as u8);
        rgba.push(if index % 3 == 0 { 0 } else { 255 });
        rgba.push(if index % 5 == 0 { 128 } else { 255 });
    }
    rgba
}

fn red(width: u32, height: u32) -> Bitmap {
    let rgba = [0xff, 0x00, 0x00, 0xff].repeat((width * height) as usize);
    Bitmap::from_rgba_data(width, height, rgba)
}

fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

//===========================================================================//

#[test]
fn payload_round_trips_losslessly() {
    for &(width, height) in [(1, 1), (2, 7), (17, 3), (128, 64), (255, 255)].iter() {
        let bitmap = Bitmap::from_rgba_data(width, height, patterned(width, height));
        let encoded = payload::encode(&bitmap).unwrap();
        let decoded = payload::decode_payload(encoded.as_bytes()).unwrap();
        assert_eq!(decoded, RgbaBuffer::composite(&bitmap), "{}x{}", width, height);
    }
}

#[test]
fn opaque_red_64x64_icon() {
    let bitmap = red(64, 64);
    let encoded = payload::encode(&bitmap).unwrap();
    let data = icondir::build(&bitmap, &encoded).unwrap();
    let n = encoded.len();
    assert_eq!(data.len(), 22 + n);
    assert_eq!(le_u16(&data, 0), 0);
    assert_eq!(le_u16(&data, 2), 1);
    assert_eq!(le_u16(&data, 4), 1);
    assert_eq!(data[6], 64);
    assert_eq!(data[7], 64);
    assert_eq!(data[8], 0);
    assert_eq!(data[9], 0);
    assert_eq!(le_u16(&data, 10), 1);
    assert_eq!(le_u16(&data, 12), 32);
    assert_eq!(le_u32(&data, 14) as usize, n);
    assert_eq!(le_u32(&data, 18), 22);
    assert_eq!(&data[22..], encoded.as_bytes());
}

#[test]
fn size_field_matches_trailing_bytes() {
    let bitmap = Bitmap::from_rgba_data(30, 9, patterned(30, 9));
    let encoded = payload::encode(&bitmap).unwrap();
    let data = icondir::build(&bitmap, &encoded).unwrap();
    assert_eq!(le_u32(&data, 14) as usize, data.len() - 22);
    assert_eq!(le_u32(&data, 18), icondir::PAYLOAD_OFFSET);
}

#[test]
fn width_of_256_is_stored_as_zero() {
    // The ICONDIRENTRY size fields are one byte; 256 wraps to 0.
    let bitmap = red(256, 255);
    let encoded = payload::encode(&bitmap).unwrap();
    let data = icondir::build(&bitmap, &encoded).unwrap();
    assert_eq!(data[6], 0);
    assert_eq!(data[7], 255);
}

#[test]
fn build_is_idempotent() {
    let bitmap = Bitmap::from_rgba_data(5, 6, patterned(5, 6));
    let encoded = payload::encode(&bitmap).unwrap();
    let first = icondir::build(&bitmap, &encoded).unwrap();
    let second = icondir::build(&bitmap, &encoded).unwrap();
    assert_eq!(first, second);
}

#[test]
fn write_matches_build() {
    let bitmap = Bitmap::from_rgba_data(8, 8, patterned(8, 8));
    let encoded = payload::encode(&bitmap).unwrap();
    let mut output = Vec::<u8>::new();
    icondir::write(&mut output, &bitmap, &encoded).unwrap();
    assert_eq!(output, icondir::build(&bitmap, &encoded).unwrap());
}

#[test]
fn icon_file_round_trip() {
    let bitmap = Bitmap::from_rgba_data(11, 13, patterned(11, 13));
    let encoded = payload::encode(&bitmap).unwrap();
    let data = icondir::build(&bitmap, &encoded).unwrap();
    let icon = IconFile::read(Cursor::new(&data)).unwrap();
    assert_eq!(icon.header().num_entries(), 1);
    let entry = &icon.entries()[0];
    assert_eq!(entry.width(), 11);
    assert_eq!(entry.height(), 13);
    assert_eq!(entry.color_planes(), 1);
    assert_eq!(entry.bits_per_pixel(), 32);
    assert_eq!(entry.num_colors(), 0);
    assert_eq!(icon.payload(0), Some(encoded.as_bytes()));
    let image = icon.decode(0).unwrap();
    assert_eq!(image.rgba_data(), patterned(11, 13).as_slice());
}

//===========================================================================//

// Accepts `limit` bytes in total, then fails.
struct FailingSink {
    limit: usize,
    received: Vec<u8>,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.received.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        let count = room.min(buf.len());
        self.received.extend_from_slice(&buf[..count]);
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Reports that it accepted nothing.
struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// Accepts at most three bytes per call.
struct TrickleSink(Vec<u8>);

impl Write for TrickleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let count = buf.len().min(3);
        self.0.extend_from_slice(&buf[..count]);
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_is_write_error() {
    let bitmap = red(16, 16);
    let encoded = payload::encode(&bitmap).unwrap();
    for &limit in [0, 5, 22, 30].iter() {
        let mut sink = FailingSink { limit, received: Vec::new() };
        let result = icondir::write(&mut sink, &bitmap, &encoded);
        assert!(matches!(result, Err(Error::Write(_))), "limit {}", limit);
    }
}

#[test]
fn sink_accepting_nothing_is_write_error() {
    let bitmap = red(4, 4);
    let encoded = payload::encode(&bitmap).unwrap();
    match icondir::write(ClosedSink, &bitmap, &encoded) {
        Err(Error::Write(error)) => {
            assert_eq!(error.kind(), io::ErrorKind::WriteZero)
        }
        other => panic!("expected a write error, got {:?}", other),
    }
}

#[test]
fn partial_writes_are_completed() {
    let bitmap = red(4, 4);
    let encoded = payload::encode(&bitmap).unwrap();
    let mut sink = TrickleSink(Vec::new());
    icondir::write(&mut sink, &bitmap, &encoded).unwrap();
    assert_eq!(sink.0, icondir::build(&bitmap, &encoded).unwrap());
}

//===========================================================================//

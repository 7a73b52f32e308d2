//! Reading and writing the ICO container: the ICONDIR header, ICONDIRENTRY
//! records, and the image data they point at.

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::payload::{self, EncodedPayload, RgbaBuffer, BITS_PER_PIXEL};
use crate::restype::ResourceType;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Seek, SeekFrom, Write};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const HEADER_LEN: u32 = 6;

/// The size of one ICONDIRENTRY record, in bytes.
pub const ENTRY_LEN: u32 = 16;

/// Where the payload of a single-image icon file starts.
pub const PAYLOAD_OFFSET: u32 = HEADER_LEN + ENTRY_LEN;

//===========================================================================//

/// The ICONDIR header at the start of every ICO file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IconDir {
    restype: ResourceType,
    num_entries: u16,
}

impl IconDir {
    /// The header for a file holding exactly one icon image.
    pub fn single_icon() -> IconDir {
        IconDir { restype: ResourceType::Icon, num_entries: 1 }
    }

    /// Returns the type of resource stored in the file.
    pub fn resource_type(&self) -> ResourceType {
        self.restype
    }

    /// Returns the number of directory entries that follow the header.
    pub fn num_entries(&self) -> u16 {
        self.num_entries
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(self.restype.number())?;
        writer.write_u16::<LittleEndian>(self.num_entries)?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<IconDir> {
        let (reserved, restype, num_entries) =
            read_header_fields(reader).map_err(Error::Read)?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = match ResourceType::from_number(restype) {
            Some(ResourceType::Icon) => ResourceType::Icon,
            Some(ResourceType::Cursor) => {
                invalid_data!("Cursor (CUR) files are not supported")
            }
            None => invalid_data!("Invalid resource type ({})", restype),
        };
        Ok(IconDir { restype, num_entries })
    }
}

fn read_header_fields<R: Read>(reader: &mut R) -> io::Result<(u16, u16, u16)> {
    let reserved = reader.read_u16::<LittleEndian>()?;
    let restype = reader.read_u16::<LittleEndian>()?;
    let num_entries = reader.read_u16::<LittleEndian>()?;
    Ok((reserved, restype, num_entries))
}

//===========================================================================//

/// One ICONDIRENTRY record: the size, color depth and location of an image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IconDirEntry {
    width: u32,
    height: u32,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_size: u32,
    data_offset: u32,
}

impl IconDirEntry {
    /// Describes `payload` as the only image in a file.  The dimensions come
    /// from `bitmap`, which must be the bitmap the payload was encoded from
    /// (or one of the same size).  Fails if the payload is too large for the
    /// 32-bit size field.
    pub fn for_payload(
        bitmap: &Bitmap,
        payload: &EncodedPayload,
    ) -> Result<IconDirEntry> {
        if payload.len() as u64 > (u32::MAX - PAYLOAD_OFFSET) as u64 {
            invalid_input!(
                "Payload too large for an ICO file (was {} bytes)",
                payload.len()
            );
        }
        Ok(IconDirEntry {
            width: bitmap.width(),
            height: bitmap.height(),
            num_colors: 0,
            color_planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            data_size: payload.len() as u32,
            data_offset: PAYLOAD_OFFSET,
        })
    }

    /// Returns the width of the image, in pixels.  When read from a file, a
    /// width byte of zero is reported as 256.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.  When read from a file, a
    /// height byte of zero is reported as 256.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the width as stored in the one-byte field.
    ///
    /// The field cannot hold 256 or more, and the value is truncated modulo
    /// 256: a width of 256 is stored as 0 (which many readers take to mean
    /// 256), while 300 is stored as 44.
    pub fn width_byte(&self) -> u8 {
        (self.width & 0xff) as u8
    }

    /// Returns the height as stored in the one-byte field, truncated modulo
    /// 256 like [`IconDirEntry::width_byte`].
    pub fn height_byte(&self) -> u8 {
        (self.height & 0xff) as u8
    }

    /// Returns the palette size; zero for anything that isn't palette-indexed.
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the number of color planes.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel (color depth) of the image.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the length of the image data, in bytes.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Returns the absolute offset of the image data within the file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.width_byte())?;
        writer.write_u8(self.height_byte())?;
        writer.write_u8(self.num_colors)?;
        writer.write_u8(0)?; // reserved
        writer.write_u16::<LittleEndian>(self.color_planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.data_size)?;
        writer.write_u32::<LittleEndian>(self.data_offset)?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<IconDirEntry> {
        let fields = read_entry_fields(reader).map_err(Error::Read)?;
        let (width_byte, height_byte, num_colors, reserved) = fields.0;
        let (color_planes, bits_per_pixel, data_size, data_offset) = fields.1;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIRENTRY \
                 (was {}, but must be 0)",
                reserved
            );
        }
        // A size byte of zero traditionally means 256.
        let width = if width_byte == 0 { 256 } else { width_byte as u32 };
        let height = if height_byte == 0 { 256 } else { height_byte as u32 };
        Ok(IconDirEntry {
            width,
            height,
            num_colors,
            color_planes,
            bits_per_pixel,
            data_size,
            data_offset,
        })
    }
}

type EntryFields = ((u8, u8, u8, u8), (u16, u16, u32, u32));

fn read_entry_fields<R: Read>(reader: &mut R) -> io::Result<EntryFields> {
    let width = reader.read_u8()?;
    let height = reader.read_u8()?;
    let num_colors = reader.read_u8()?;
    let reserved = reader.read_u8()?;
    let color_planes = reader.read_u16::<LittleEndian>()?;
    let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
    let data_size = reader.read_u32::<LittleEndian>()?;
    let data_offset = reader.read_u32::<LittleEndian>()?;
    Ok((
        (width, height, num_colors, reserved),
        (color_planes, bits_per_pixel, data_size, data_offset),
    ))
}

//===========================================================================//

/// Serializes a single-image icon file: the header, one directory entry,
/// then the payload bytes with nothing in between.
///
/// `payload` must have been encoded from `bitmap` (or from a bitmap of the
/// same size); the pairing is not checked.
pub fn build(bitmap: &Bitmap, payload: &EncodedPayload) -> Result<Vec<u8>> {
    let header = IconDir::single_icon();
    let entry = IconDirEntry::for_payload(bitmap, payload)?;
    let mut data = Vec::with_capacity(PAYLOAD_OFFSET as usize + payload.len());
    header.write_to(&mut data)?;
    entry.write_to(&mut data)?;
    debug_assert_eq!(data.len(), PAYLOAD_OFFSET as usize);
    data.extend_from_slice(payload.as_bytes());
    if bitmap.width() > 255 || bitmap.height() > 255 {
        tracing::debug!(
            "{}x{} does not fit the one-byte size fields; stored as {}x{}",
            bitmap.width(),
            bitmap.height(),
            entry.width_byte(),
            entry.height_byte()
        );
    }
    Ok(data)
}

/// Writes the bytes produced by [`build`] to `writer` in one ordered
/// sequence.  The writer is neither flushed nor closed.  Any failure to
/// accept every byte, including a writer that stops accepting data, is
/// reported as [`Error::Write`].
pub fn write<W: Write>(
    mut writer: W,
    bitmap: &Bitmap,
    payload: &EncodedPayload,
) -> Result<()> {
    let data = build(bitmap, payload)?;
    writer.write_all(&data).map_err(Error::Write)?;
    Ok(())
}

//===========================================================================//

/// An ICO file read back into memory.
#[derive(Clone, Debug)]
pub struct IconFile {
    header: IconDir,
    entries: Vec<IconDirEntry>,
    payloads: Vec<Vec<u8>>,
}

impl IconFile {
    /// Reads an ICO file: the header, every directory entry, then the data
    /// each entry points at.
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<IconFile> {
        let header = IconDir::read_from(&mut reader)?;
        let num_entries = header.num_entries() as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            entries.push(IconDirEntry::read_from(&mut reader)?);
        }
        let mut payloads = Vec::<Vec<u8>>::with_capacity(num_entries);
        for entry in entries.iter() {
            reader
                .seek(SeekFrom::Start(entry.data_offset() as u64))
                .map_err(Error::Read)?;
            let mut data = vec![0u8; entry.data_size() as usize];
            if let Err(error) = reader.read_exact(&mut data) {
                if error.kind() == io::ErrorKind::UnexpectedEof {
                    invalid_data!(
                        "Image data runs past end of file \
                         ({} bytes at offset {})",
                        entry.data_size(),
                        entry.data_offset()
                    );
                }
                return Err(Error::Read(error));
            }
            payloads.push(data);
        }
        Ok(IconFile { header, entries, payloads })
    }

    /// Returns the file header.
    pub fn header(&self) -> &IconDir {
        &self.header
    }

    /// Returns the directory entries, in file order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Returns the raw image data for entry `index`.
    pub fn payload(&self, index: usize) -> Option<&[u8]> {
        self.payloads.get(index).map(Vec::as_slice)
    }

    /// Decodes the PNG image of entry `index`, checking that its size
    /// matches the directory entry.
    pub fn decode(&self, index: usize) -> Result<RgbaBuffer> {
        let (entry, data) =
            match (self.entries.get(index), self.payloads.get(index)) {
                (Some(entry), Some(data)) => (entry, data),
                _ => invalid_input!(
                    "No entry {} (file has {})",
                    index,
                    self.entries.len()
                ),
            };
        let buffer = payload::decode_payload(data.as_slice())?;
        if buffer.width() & 0xff != entry.width() & 0xff
            || buffer.height() & 0xff != entry.height() & 0xff
        {
            invalid_data!(
                "Encoded image has wrong dimensions \
                 (was {}x{}, but should be {}x{})",
                buffer.width(),
                buffer.height(),
                entry.width(),
                entry.height()
            );
        }
        Ok(buffer)
    }
}

//===========================================================================//


//===========================================================================//

//! Image structure tags
//!
//! Dimensions, sample layout, compression, photometric interpretation,
//! strips and colour maps.

use log::{debug, warn};

use crate::raster::DataType;
use crate::tiff::builders::{ExternalData, ImageData};
use crate::tiff::constants::{tags, field_types, photometric, planar_config, extra_samples};
use crate::tiff::ifd::{IFD, IFDEntry};
use crate::utils::tiff_utils;

/// Adds image structure tags to an IFD
pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    /// Adds BitsPerSample, one value per sample
    pub fn add_bits_per_sample(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        bits_per_channel: &[u16]
    ) {
        debug!("Adding BitsPerSample: {:?}", bits_per_channel);

        if let [bits] = bits_per_channel {
            ifd.add_entry(IFDEntry::new(tags::BITS_PER_SAMPLE, field_types::SHORT, 1, *bits as u64));
        } else {
            tiff_utils::create_external_tag(
                ifd, external_data, ifd_index,
                tags::BITS_PER_SAMPLE, field_types::SHORT,
                tiff_utils::shorts_to_le_bytes(bits_per_channel));
        }
    }

    /// Adds SampleFormat, one value per sample
    pub fn add_sample_format(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        format: u16,
        samples: u16
    ) {
        if samples == 1 {
            ifd.add_entry(IFDEntry::new(tags::SAMPLE_FORMAT, field_types::SHORT, 1, format as u64));
        } else {
            tiff_utils::create_external_tag(
                ifd, external_data, ifd_index,
                tags::SAMPLE_FORMAT, field_types::SHORT,
                tiff_utils::shorts_to_le_bytes(&vec![format; samples as usize]));
        }
    }

    /// Adds the tags describing a chunky raster of `samples` channels
    ///
    /// One channel is written as BlackIsZero, three or four as RGB; any
    /// channels beyond the colour ones are declared as extra samples, the
    /// first of which is treated as alpha for 2 and 4 channel images.
    #[allow(clippy::too_many_arguments)]
    pub fn add_image_structure_tags(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        width: u32,
        height: u32,
        samples: u16,
        data_type: DataType,
        compression: u16
    ) {
        debug!("Adding image structure tags: {}x{}x{} {}", width, height, samples, data_type);

        ifd.add_entry(IFDEntry::new(tags::NEW_SUBFILE_TYPE, field_types::LONG, 1, 0));
        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, width as u64));
        ifd.add_entry(IFDEntry::new(tags::IMAGE_LENGTH, field_types::LONG, 1, height as u64));

        let bits = vec![data_type.bits(); samples as usize];
        Self::add_bits_per_sample(ifd, external_data, ifd_index, &bits);

        ifd.add_entry(IFDEntry::new(tags::COMPRESSION, field_types::SHORT, 1, compression as u64));

        let (interpretation, colour_samples) = if samples >= 3 {
            (photometric::RGB, 3)
        } else {
            (photometric::BLACK_IS_ZERO, 1)
        };
        ifd.add_entry(IFDEntry::new(
            tags::PHOTOMETRIC_INTERPRETATION, field_types::SHORT, 1, interpretation as u64));
        ifd.add_entry(IFDEntry::new(tags::SAMPLES_PER_PIXEL, field_types::SHORT, 1, samples as u64));
        ifd.add_entry(IFDEntry::new(
            tags::PLANAR_CONFIGURATION, field_types::SHORT, 1, planar_config::CHUNKY as u64));

        if samples > colour_samples {
            let mut extra = vec![extra_samples::UNSPECIFIED; (samples - colour_samples) as usize];
            if samples == 2 || samples == 4 {
                extra[0] = extra_samples::UNASSOCIATED_ALPHA;
            }
            tiff_utils::create_external_tag(
                ifd, external_data, ifd_index,
                tags::EXTRA_SAMPLES, field_types::SHORT,
                tiff_utils::shorts_to_le_bytes(&extra));
        }

        Self::add_sample_format(ifd, external_data, ifd_index, data_type.sample_format(), samples);
    }

    /// Stores the whole image as a single strip
    ///
    /// StripOffsets is a placeholder until the writer knows where the strip
    /// lands. BigTIFF files get 64-bit offset and count fields.
    pub fn setup_single_strip(
        ifd: &mut IFD,
        image_data: &mut ImageData,
        ifd_index: usize,
        strip_data: Vec<u8>,
        rows: u32,
        is_big_tiff: bool
    ) {
        debug!("Setting up single strip: {} bytes", strip_data.len());

        let offset_type = if is_big_tiff { field_types::LONG8 } else { field_types::LONG };
        ifd.add_entry(IFDEntry::new(tags::STRIP_OFFSETS, offset_type, 1, 0));
        ifd.add_entry(IFDEntry::new(tags::STRIP_BYTE_COUNTS, offset_type, 1, strip_data.len() as u64));
        ifd.add_entry(IFDEntry::new(tags::ROWS_PER_STRIP, field_types::LONG, 1, rows as u64));

        image_data.insert(ifd_index, strip_data);
    }

    /// Switches the IFD to palette mode with the given colour map
    ///
    /// `color_map` holds all red values, then all green, then all blue, and
    /// must have `3 * 2^bits` entries.
    pub fn add_color_map(
        ifd: &mut IFD,
        external_data: &mut ExternalData,
        ifd_index: usize,
        color_map: &[u16]
    ) {
        if color_map.len() % 3 != 0 {
            warn!("Color map length {} is not divisible by 3, skipping", color_map.len());
            return;
        }
        debug!("Adding color map with {} entries", color_map.len() / 3);

        ifd.add_entry(IFDEntry::new(
            tags::PHOTOMETRIC_INTERPRETATION, field_types::SHORT, 1, photometric::PALETTE as u64));
        tiff_utils::create_external_tag(
            ifd, external_data, ifd_index,
            tags::COLOR_MAP, field_types::SHORT,
            tiff_utils::shorts_to_le_bytes(color_map));
    }
}

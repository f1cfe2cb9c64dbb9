//! The gallery-facing view of a photo's Exif.
//!
//! [`ExtractedMetadata`] names the handful of fields a gallery shows: camera,
//! exposure, location, and when the photo was taken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::ExtractionError,
    exif::{Exif, ExifIfdTag, GpsIfdTag, Ifd0Tag, IfdMap},
};

mod date;
pub mod gps;

pub use date::{EXIF_DATE_TIME_FORMAT, ExifDateTime};

/// Named metadata pulled from a photo's Exif.
///
/// Every Exif-derived field is optional. Missing fields are left out when
/// serialized, and keys are camelCase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    /// Whether a readable Exif block was found.
    pub has_exif: bool,

    //
    // IFD 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,

    /// Exif orientation, `1` to `8`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u32>,

    /// When the file was last changed (IFD 0 `DateTime`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<ExifDateTime>,

    //
    // Exif IFD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_original: Option<ExifDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_digitized: Option<ExifDateTime>,

    /// In seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_program: Option<u32>,

    /// The first of the listed sensitivities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_speed_ratings: Option<u32>,

    /// In EV.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_bias_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metering_mode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<u32>,

    /// In millimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_balance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_x_dimension: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_y_dimension: Option<u32>,

    //
    // GPS IFD
    /// Decimal degrees. Negative is South.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,

    /// Decimal degrees. Negative is West.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,

    /// Meters. Negative is below sea level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_altitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_date_time: Option<DateTime<Utc>>,

    /// Whether both latitude and longitude were found.
    pub has_gps_data: bool,

    //
    // derived
    /// The best capture date we found: original, then digitized, then last
    /// modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<ExifDateTime>,

    /// The caller's fallback timestamp, like the file's modification time.
    pub original_timestamp: DateTime<Utc>,

    /// What went wrong, if the Exif was damaged.
    ///
    /// Files that simply don't carry Exif leave this empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl ExtractedMetadata {
    /// A record with nothing but the fallback timestamp.
    pub fn fallback_only(original_timestamp: DateTime<Utc>) -> Self {
        Self {
            has_exif: false,
            make: None,
            model: None,
            software: None,
            artist: None,
            image_description: None,
            copyright: None,
            orientation: None,
            date_modified: None,
            date_time_original: None,
            date_time_digitized: None,
            exposure_time: None,
            f_number: None,
            exposure_program: None,
            iso_speed_ratings: None,
            exposure_bias_value: None,
            metering_mode: None,
            flash: None,
            focal_length: None,
            white_balance: None,
            lens_make: None,
            lens_model: None,
            pixel_x_dimension: None,
            pixel_y_dimension: None,
            gps_latitude: None,
            gps_longitude: None,
            gps_altitude: None,
            gps_date_time: None,
            has_gps_data: false,
            date_created: None,
            original_timestamp,
            extraction_error: None,
        }
    }

    /// A record for a file we couldn't get Exif from.
    ///
    /// Only unexpected errors are recorded in `extraction_error`.
    pub fn without_exif(original_timestamp: DateTime<Utc>, error: &ExtractionError) -> Self {
        Self {
            extraction_error: (!error.is_degraded()).then(|| error.to_string()),
            ..Self::fallback_only(original_timestamp)
        }
    }

    /// Names the fields of a decoded Exif block.
    pub fn from_exif(exif: &Exif, original_timestamp: DateTime<Utc>) -> Self {
        let empty = IfdMap::new();
        let ifd0 = &exif.ifd0;
        let exif_ifd = exif.exif_ifd.as_ref().unwrap_or(&empty);
        let gps_ifd = exif.gps_ifd.as_ref().unwrap_or(&empty);

        let text = |map: &IfdMap, tag: u16| map.text(tag).map(str::to_owned);
        let date_of = |map: &IfdMap, tag: u16| map.text(tag).and_then(ExifDateTime::parse);

        let date_time_original = date_of(exif_ifd, ExifIfdTag::DateTimeOriginal.tag_id());
        let date_time_digitized = date_of(exif_ifd, ExifIfdTag::DateTimeDigitized.tag_id());
        let date_modified = date_of(ifd0, Ifd0Tag::DateTime.tag_id());

        let date_created = date_time_original
            .clone()
            .or_else(|| date_time_digitized.clone())
            .or_else(|| date_modified.clone());

        let gps = GpsFields::new(gps_ifd);

        let extraction_error = match exif.sub_ifd_errors.as_slice() {
            [] => None,
            errors => Some(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        };

        Self {
            has_exif: true,

            make: text(ifd0, Ifd0Tag::Make.tag_id()),
            model: text(ifd0, Ifd0Tag::Model.tag_id()),
            software: text(ifd0, Ifd0Tag::Software.tag_id()),
            artist: text(ifd0, Ifd0Tag::Artist.tag_id()),
            image_description: text(ifd0, Ifd0Tag::ImageDescription.tag_id()),
            copyright: text(ifd0, Ifd0Tag::Copyright.tag_id()),
            orientation: ifd0.u32(Ifd0Tag::Orientation),
            date_modified,

            date_time_original,
            date_time_digitized,
            exposure_time: exif_ifd.f64(ExifIfdTag::ExposureTime),
            f_number: exif_ifd.f64(ExifIfdTag::FNumber),
            exposure_program: exif_ifd.u32(ExifIfdTag::ExposureProgram),
            iso_speed_ratings: exif_ifd.u32(ExifIfdTag::PhotographicSensitivity),
            exposure_bias_value: exif_ifd.f64(ExifIfdTag::ExposureBiasValue),
            metering_mode: exif_ifd.u32(ExifIfdTag::MeteringMode),
            flash: exif_ifd.u32(ExifIfdTag::Flash),
            focal_length: exif_ifd.f64(ExifIfdTag::FocalLength),
            white_balance: exif_ifd.u32(ExifIfdTag::WhiteBalance),
            lens_make: text(exif_ifd, ExifIfdTag::LensMake.tag_id()),
            lens_model: text(exif_ifd, ExifIfdTag::LensModel.tag_id()),
            pixel_x_dimension: exif_ifd.u32(ExifIfdTag::PixelXDimension),
            pixel_y_dimension: exif_ifd.u32(ExifIfdTag::PixelYDimension),

            has_gps_data: gps.latitude.is_some() && gps.longitude.is_some(),
            gps_latitude: gps.latitude,
            gps_longitude: gps.longitude,
            gps_altitude: gps.altitude,
            gps_date_time: gps.date_time,

            date_created,
            original_timestamp,
            extraction_error,
        }
    }

    /// The capture date as an instant, or the fallback timestamp when there
    /// isn't a usable one.
    ///
    /// Exif dates have no time zone, so they're read as UTC.
    pub fn best_date(&self) -> DateTime<Utc> {
        self.date_created
            .as_ref()
            .and_then(ExifDateTime::to_utc)
            .unwrap_or(self.original_timestamp)
    }

    /// Whether there's anything worth showing beyond "No EXIF data
    /// available".
    pub fn has_displayable_fields(&self) -> bool {
        self.has_exif
            && (self.make.is_some()
                || self.model.is_some()
                || self.date_created.is_some()
                || self.exposure_time.is_some()
                || self.f_number.is_some()
                || self.iso_speed_ratings.is_some()
                || self.focal_length.is_some()
                || self.lens_model.is_some()
                || self.has_gps_data)
    }
}

/// The GPS IFD, converted.
struct GpsFields {
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude: Option<f64>,
    date_time: Option<DateTime<Utc>>,
}

impl GpsFields {
    fn new(gps_ifd: &IfdMap) -> Self {
        let latitude_ref = gps_ifd.text(GpsIfdTag::GPSLatitudeRef);
        let latitude = gps_ifd
            .f64_list(GpsIfdTag::GPSLatitude)
            .and_then(|v| gps::coordinate(&v, latitude_ref));

        let longitude_ref = gps_ifd.text(GpsIfdTag::GPSLongitudeRef);
        let longitude = gps_ifd
            .f64_list(GpsIfdTag::GPSLongitude)
            .and_then(|v| gps::coordinate(&v, longitude_ref));

        let altitude = gps_ifd
            .f64(GpsIfdTag::GPSAltitude)
            .map(|a| gps::altitude(a, gps_ifd.byte(GpsIfdTag::GPSAltitudeRef)));

        let date_time = gps_ifd
            .f64_list(GpsIfdTag::GPSTimeStamp)
            .zip(gps_ifd.text(GpsIfdTag::GPSDateStamp))
            .and_then(|(time, date)| gps::date_time(&time, date));

        Self {
            latitude,
            longitude,
            altitude,
            date_time,
        }
    }
}

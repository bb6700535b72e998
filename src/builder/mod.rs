mod ec;
mod qr;

pub use qr::QR;

use log::debug;

use crate::common::{
    codec::{encode, encode_with_version},
    error::{QRError, QRResult},
    mask::{mask_layer, mask_layers, select_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

/// Configures and runs the encoding pipeline for a byte payload.
///
/// ```
/// use qrbyte::{ECLevel, QRBuilder};
///
/// let qr = QRBuilder::new(b"HELLO").ec_level(ECLevel::M).build().unwrap();
/// assert_eq!(*qr.version(), 1);
/// ```
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    /// Pins the version instead of picking the smallest one that fits.
    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Forces a mask pattern and skips penalty scoring.
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let version = self.version.map_or("None".to_string(), |v| v.to_string());
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        format!("{{ Version: {version}, Ec level: {}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::InvalidInput("Empty data"));
        }

        // Encode data into data codewords
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, self.ec_level, v)?, v),
            None => encode(self.data, self.ec_level)?,
        };
        debug!(
            "Encoded {} bytes into {} data codewords for version {version}",
            self.data.len(),
            encoded_data.len() >> 3
        );

        // Error correction and interleaving
        let payload = ec::build_payload(encoded_data.data(), version, self.ec_level);
        debug!(
            "Constructed payload of {} codewords and {} remainder bits",
            version.total_codewords(self.ec_level),
            version.remainder_bits()
        );

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        let base = qr.matrix().clone();
        qr.draw_payload(payload);

        let mask = match self.mask {
            Some(m) => {
                debug!("Applying mask {m}");
                qr.apply_mask(m, &mask_layer(&base, m));
                m
            }
            None => {
                let candidates = mask_layers(&base);
                let (m, masked, score) = select_mask(qr.matrix(), &candidates);
                debug!("Selected mask {m} with penalty {score}");
                qr.commit_mask(m, &masked);
                m
            }
        };

        qr.draw_format_info(mask);
        qr.draw_version_info();

        if let Some((x, y)) = qr.matrix().first_unset() {
            return Err(QRError::IncompleteSymbol { x, y });
        }

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            "Encoded as {}, dark modules {dark_modules} of {total_modules}",
            qr.metadata()
        );

        Ok(qr)
    }
}

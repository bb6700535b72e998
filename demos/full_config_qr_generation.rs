use std::error::Error;

use qrbyte::{ECLevel, MaskPattern, QRBuilder, Version};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "This example shows all available configuration options for QR code generation.";

    let qr = QRBuilder::new(data.as_bytes())
        .version(Version::new(8)?) // QR version (size) - if not provided, finds smallest version to fit data
        .ec_level("h".parse::<ECLevel>()?) // Error correction level - if not provided, defaults to ECLevel::M
        .mask(MaskPattern::new(2)?) // Mask pattern - if not provided, finds best mask based on penalty score
        .build()?;

    // 6 pixels per module plus a 4 module quiet zone
    let img = qr.render(6)?;
    img.save("configured_qr.png")?;

    println!("Configured QR code saved to: configured_qr.png");
    println!("QR metadata: {}", qr.metadata());

    Ok(())
}

use std::error::Error;

use qrbyte::encode;

fn main() -> Result<(), Box<dyn Error>> {
    // Smallest version that fits, level M, lowest penalty mask
    let qr = encode("Hello, World!", None)?;

    // One pixel per module, no quiet zone
    let img = qr.to_image()?;
    img.save("simple_qr.png")?;

    println!("Simple QR code saved to: simple_qr.png");
    println!("{}", qr.to_str(1)?);
    Ok(())
}

//! Encode and decode a small login packet with buffproto

use buffproto::{Endianness, FieldDef, Record, StringOptions, UIntOptions, compile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Buffproto Login Packet Example");
    println!("==============================\n");

    // Magic literal, a version with a default, and a mix of string layouts
    let schema = compile(&[
        FieldDef::new("uint").options(UIntOptions::new(2)).value(0xB0B0u16),
        FieldDef::new("uint")
            .named("version")
            .options(UIntOptions::new(1))
            .value(1u8),
        FieldDef::new("string")
            .named("user")
            .options(StringOptions::prefixed(1)),
        FieldDef::new("uint")
            .named("session")
            .options(UIntOptions::new(4).endian(Endianness::Little)),
        FieldDef::new("string")
            .named("motd")
            .options(StringOptions::null_terminated()),
        FieldDef::new("uint")
            .named("ports")
            .options(UIntOptions::new(2))
            .repeated(u32::MAX),
    ])?;
    println!("Compiled schema with {} fields", schema.len());

    let record = Record::new()
        .with("user", "alice")
        .with("session", 42u32)
        .with("motd", "hello")
        .with("ports", vec![22u16, 443]);

    // Encode
    let encoded = schema.encode(&record)?;
    println!("Encoded to {} bytes: {:02x?}", encoded.len(), encoded.as_ref());

    // Decode
    let decoded = schema.decode_with_length(&encoded)?;
    println!("Decoded {} bytes: {:?}", decoded.length, decoded.data);

    Ok(())
}

use crate::errors::CliError;
use crate::println_pad;
use agg_archive::SpriteSheet;
use camino::Utf8PathBuf;
use colored::Colorize;
use miette::Result;

pub struct IcnInfoArgs {
    pub file: Utf8PathBuf,
}

pub fn icn_info(args: IcnInfoArgs) -> Result<()> {
    let data = std::fs::read(&args.file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: args.file.clone(),
        },
        _ => CliError::from(e),
    })?;
    let sheet = SpriteSheet::parse(&data).map_err(CliError::from)?;

    println_pad!(
        "{} {}",
        "🖼️  Sprite sheet:".bright_blue().bold(),
        args.file.as_str().bright_cyan().bold()
    );
    println_pad!(
        "{} {}  {} {}",
        "Slots:".bright_green(),
        sheet.slot_count().to_string().bright_white().bold(),
        "Payload:".bright_green(),
        format!("{} bytes", sheet.payload_size).bright_white().bold()
    );

    for (index, slot) in sheet.slots().iter().enumerate() {
        let header = &slot.header;
        println_pad!(
            "   {} {:>3}  {}x{}  offset ({}, {})  frames {}  {}",
            "•".bright_cyan(),
            index,
            header.width,
            header.height,
            header.offset_x,
            header.offset_y,
            header.animation_frames,
            format!("data @ {}", header.offset_data).dimmed()
        );
    }
    Ok(())
}

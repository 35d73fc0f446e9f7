//! Prints the Agora request body each `dynamb` line would produce, without
//! sending anything. Reads JSON lines from the given file or stdin.

use barnacles_agora_core::{EventType, InboundEvent, SourceData};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1);
    let reader: Box<dyn BufRead> = match path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event: InboundEvent = serde_json::from_str(&line)?;
        if event.event_type() != Some(EventType::Dynamb) {
            println!("skip\t{}", event.name);
            continue;
        }

        let body = serde_json::to_string(&[SourceData::from_dynamb(&event.data)])?;
        println!("post\t{body}");
    }

    Ok(())
}

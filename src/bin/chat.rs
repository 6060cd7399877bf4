use std::io::stdin;

use attachment_style::{render_report, Choice, ScoreTally, SCENARIOS};

fn main() {
    println!("💬 Attachment style chat simulator");
    println!("Ten conversations with a partner. Pick the reply you would actually send.");
    println!();

    while let Some(tally) = run_simulation() {
        println!("{}", render_report(&tally));
        if !wants_retake() {
            break;
        }
        println!();
    }
}

fn run_simulation() -> Option<ScoreTally> {
    let total = SCENARIOS.scenarios.len();
    let mut tally = ScoreTally::new();
    for (number, scenario) in SCENARIOS.scenarios.iter().enumerate() {
        println!("Conversation {}/{}", number + 1, total);
        for message in &scenario.messages {
            println!("  > {}", message);
        }
        println!("Your reply?");
        for (option_no, reply) in scenario.replies.iter().enumerate() {
            println!("  {}. {}", option_no + 1, reply.text);
        }
        let choice = prompt_choice()?;
        tally = tally.record(scenario.category(choice));
        println!();
    }
    Some(tally)
}

fn prompt_choice() -> Option<Choice> {
    loop {
        match read_line()?.parse::<Choice>() {
            Ok(choice) => return Some(choice),
            Err(_) => println!("Please answer with 1-4 (or a-d)."),
        }
    }
}

fn wants_retake() -> bool {
    println!("Run the simulation again? [y/N]");
    match read_line() {
        Some(line) => matches!(line.trim(), "y" | "Y" | "yes"),
        None => false,
    }
}

fn read_line() -> Option<String> {
    let mut buffer = String::new();
    match stdin().read_line(&mut buffer) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buffer),
    }
}

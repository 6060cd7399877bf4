use std::io::stdin;

use attachment_style::{render_report, Choice, ScoreTally, QUESTIONNAIRE};

fn main() {
    println!("💕 What's your attachment style?");
    println!("Ten questions about how you connect in relationships.");
    println!();

    while let Some(tally) = take_questionnaire() {
        println!("{}", render_report(&tally));
        if !wants_retake() {
            break;
        }
        println!();
    }
}

fn take_questionnaire() -> Option<ScoreTally> {
    let total = QUESTIONNAIRE.questions.len();
    let mut tally = ScoreTally::new();
    for (number, question) in QUESTIONNAIRE.questions.iter().enumerate() {
        println!("Question {}/{}", number + 1, total);
        println!("{}", question.text);
        for (option_no, option) in question.options.iter().enumerate() {
            println!("  {}. {}", option_no + 1, option.text);
        }
        let choice = prompt_choice()?;
        tally = tally.record(question.category(choice));
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
    println!("Take the test again? [y/N]");
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

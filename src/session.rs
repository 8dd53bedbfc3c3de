use crate::ack::CopyAck;
use crate::backend::StoryBackend;
use crate::clipboard::ClipboardChain;
use crate::consistency::{build_appearance_block, build_cref_directive};
use crate::workflow::{label_for, PromptSet, PromptWorkflow, WorkflowState};
use anyhow::Result;
use indicatif::ProgressBar;
use inquire::{Confirm, Select};
use log::error;
use std::time::Duration;

const MENU_REGENERATE: &str = "Regenerate";
const MENU_COPY_ALL: &str = "Copy all";
const MENU_COPY_ONE: &str = "Copy a prompt";
const MENU_CHARACTERS: &str = "Character consistency";
const MENU_QUIT: &str = "Quit";

#[derive(PartialEq)]
enum Outcome {
    Regenerate,
    Quit,
}

/// Drive one storybook session: fetch the prompts, show them labeled,
/// then loop on the review menu until the user quits.
pub async fn run(sip_id: &str, backend: Box<dyn StoryBackend>, clipboard: ClipboardChain) -> Result<()> {
    let mut workflow = PromptWorkflow::new(backend, clipboard);

    loop {
        let spinner = spinner("Generating prompts...");
        let _ = workflow.load(Some(sip_id)).await;
        spinner.finish_and_clear();

        match workflow.state() {
            WorkflowState::Ready(_) => {
                if review(&mut workflow, sip_id).await? == Outcome::Regenerate {
                    continue;
                }
                return Ok(());
            }
            WorkflowState::Error(msg) => {
                eprintln!("{}", msg);
                if Confirm::new("Try again?").with_default(true).prompt()? {
                    continue;
                }
                return Ok(());
            }
            // Missing id is caught in main before we get here.
            _ => return Ok(()),
        }
    }
}

async fn review(workflow: &mut PromptWorkflow, sip_id: &str) -> Result<Outcome> {
    let set = match workflow.state() {
        WorkflowState::Ready(set) => set.clone(),
        _ => return Ok(Outcome::Quit),
    };

    print_prompts(&set);

    loop {
        let options = vec![
            MENU_REGENERATE,
            MENU_COPY_ALL,
            MENU_COPY_ONE,
            MENU_CHARACTERS,
            MENU_QUIT,
        ];

        match Select::new("Midjourney prompts:", options).prompt()? {
            MENU_REGENERATE => return Ok(Outcome::Regenerate),
            MENU_COPY_ALL => {
                workflow.copy_all(&set);
                show_ack("All prompts").await;
            }
            MENU_COPY_ONE => {
                let labels: Vec<String> = (0..set.len()).map(label_for).collect();
                let picked = Select::new("Copy which prompt?", labels).raw_prompt()?;
                if let Some(text) = set.get(picked.index) {
                    let text = text.to_string();
                    workflow.copy_one(&text);
                    show_ack(&picked.value).await;
                }
            }
            MENU_CHARACTERS => show_character_fragments(workflow, sip_id).await?,
            _ => return Ok(Outcome::Quit),
        }
    }
}

fn print_prompts(set: &PromptSet) {
    if set.is_empty() {
        println!("No prompts yet.");
        return;
    }

    for (idx, text) in set.iter().enumerate() {
        println!("\n{} (#{})", label_for(idx), idx + 1);
        println!("{}", text);
    }
    println!();
}

/// Fetch the character roster and print the reusable consistency
/// fragments, with an offer to copy them.
async fn show_character_fragments(workflow: &mut PromptWorkflow, sip_id: &str) -> Result<()> {
    let spinner = spinner("Describing characters...");
    let result = workflow.backend().describe_characters(sip_id).await;
    spinner.finish_and_clear();

    let characters = match result {
        Ok(characters) => characters,
        Err(e) => {
            error!("Failed describing characters: {:#}", e);
            eprintln!("Failed to describe characters. Try again.");
            return Ok(());
        }
    };

    let appearance = build_appearance_block(&characters);
    let cref = build_cref_directive(&characters);

    let fragments: Vec<&str> = [appearance.as_str(), cref.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    if fragments.is_empty() {
        println!("No character descriptions available yet.");
        return Ok(());
    }

    for fragment in &fragments {
        println!("\n{}", fragment);
    }
    println!();

    if Confirm::new("Copy fragments to clipboard?")
        .with_default(true)
        .prompt()?
    {
        workflow.copy_one(&fragments.join("\n\n"));
        show_ack("Fragments").await;
    }

    Ok(())
}

/// Hold a "Copied" acknowledgment on screen, then let the menu redraw.
async fn show_ack(target: &str) {
    let mut ack = CopyAck::new();
    ack.trigger();
    println!("{}: Copied ✓", target);
    while ack.is_visible() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

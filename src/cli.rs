// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendtrack")
        .version(crate_version!())
        .about("Shared expense tracking, budgets, and tiered spending reports")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_name("EMAIL")
                .help("Acting user identity"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Register a user")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(
                            Arg::new("tier")
                                .long("tier")
                                .default_value("free")
                                .help("free | premium | business"),
                        ),
                )
                .subcommand(
                    Command::new("set-tier")
                        .about("Change a user's subscription tier")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("tier").long("tier").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List users"))),
        )
        .subcommand(
            Command::new("group")
                .about("Manage shared groups")
                .subcommand(
                    Command::new("create")
                        .about("Create a group owned by the acting user")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("add-member")
                        .about("Add a user to a group")
                        .arg(Arg::new("group").long("group").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List groups for the acting user"),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category in the current scope")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List categories")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove an unreferenced category")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new("tags")
                                .long("tags")
                                .help("Comma-separated tags (business tier)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expenses in a window")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an expense")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage budgets")
                .subcommand(
                    Command::new("set")
                        .about("Create a budget for a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("monthly")
                                .help("weekly | monthly | yearly"),
                        )
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List budgets"))),
        )
        .subcommand(
            Command::new("report")
                .about("Spending reports (premium tier)")
                .subcommand(json_flags(
                    Command::new("monthly")
                        .about("Monthly category report")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("yearly")
                        .about("Yearly report with forecast")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(clap::value_parser!(i32)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("range")
                        .about("Custom date-range report")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ))
                .subcommand(
                    Command::new("export")
                        .about("Export a monthly report to CSV (business tier)")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").about("Import records").subcommand(
                Command::new("expenses")
                    .about("Import expenses from a bank CSV (date,description,amount[,category])")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("rules")
                .about("Auto-categorization rules")
                .subcommand(
                    Command::new("add")
                        .about("Add a regex rule")
                        .arg(Arg::new("pattern").long("pattern").required(true))
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List rules")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a rule")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings (advisor_url, anomaly_mode, forecast_mode)")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(
                    Command::new("get").arg(Arg::new("key").long("key").required(true)),
                ),
        )
}

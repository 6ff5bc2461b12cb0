use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "siftql.pest"]
pub struct SiftqlParser;

mod legibility;
mod prepare;
mod sanitize;

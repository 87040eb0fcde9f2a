//! HTML/CSS overlay generation for detected checkboxes.
//!
//! The overlay is two files that a sheet viewer expects side by side: an
//! HTML fragment with one `<input type="checkbox">` marker per detected
//! box, and a stylesheet positioning the markers over the sheet image.
//! Markers are positioned relative to a master group anchored at the
//! top-left corner of the bounding box of all markers, so the whole
//! group can be nudged by editing a single rule.

use std::fmt::Write;

use crate::geom::Rect;

/// Rendered marker size in pixels.  Detected box sizes gate acceptance
/// but do not affect rendering.
pub const BOX_SIZE_PX: u32 = 16;

/// The top-left corner of the bounding box of all markers, used as the
/// master group offset.  `(0, 0)` for an empty box list.
pub fn group_origin(boxes: &[Rect]) -> (u32, u32) {
    let min_x = boxes.iter().map(Rect::left).min().unwrap_or(0);
    let min_y = boxes.iter().map(Rect::top).min().unwrap_or(0);
    (min_x, min_y)
}

/// Render the HTML document for a sheet overlay.  `boxes` must already
/// be in final sorted order; markers get stable 1-based ids `box1..boxN`
/// and a tooltip recording their absolute pixel position.
pub fn html_document(title: &str, css_filename: &str, boxes: &[Rect]) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>{}</title>\n\
         \x20   <link rel=\"stylesheet\" href=\"css/{}\">\n\
         </head>\n\
         <body>\n\
         <div id=\"ship-diagram\">\n\
         \x20   <div id=\"checkbox-master-group\">\n",
        title, css_filename
    );
    for (i, b) in boxes.iter().enumerate() {
        let _ = writeln!(
            html,
            "        <input type=\"checkbox\" id=\"box{id}\" title=\"box{id}: x={x}px, y={y}px\">",
            id = i + 1,
            x = b.left(),
            y = b.top()
        );
    }
    html.push_str("    </div>\n</div>\n</body>\n</html>\n");
    html
}

/// Render the stylesheet for a sheet overlay: the diagram container
/// sized to the source image with the sheet as its background, fixed
/// size checkbox markers, the master group offset, and one position
/// rule per marker relative to the group.
pub fn stylesheet(bg_filename: &str, width: u32, height: u32, boxes: &[Rect]) -> String {
    let (min_x, min_y) = group_origin(boxes);
    let mut css = format!(
        "/* Auto-generated overlay stylesheet (px units). */\n\
         body {{ font-family: sans-serif; }}\n\
         #ship-diagram {{\n\
         \x20   position: relative; width: {width}px; height: {height}px; margin: 20px;\n\
         \x20   background-image: url('../images/{bg}');\n\
         \x20   background-repeat: no-repeat; background-size: contain;\n\
         \x20   border: 1px solid #ccc;\n\
         }}\n\
         #checkbox-master-group {{\n\
         \x20   position: relative; top: {min_y}px; left: {min_x}px;\n\
         }}\n\
         #checkbox-master-group input[type=\"checkbox\"] {{\n\
         \x20   position: absolute; width: {size}px; height: {size}px;\n\
         \x20   margin: 0; padding: 0; cursor: pointer; box-sizing: border-box;\n\
         \x20   appearance: none; -webkit-appearance: none;\n\
         \x20   border: 1px solid rgba(128, 128, 128, 0.5);\n\
         }}\n\
         #checkbox-master-group input[type=\"checkbox\"]:not(:checked) {{\n\
         \x20   border: 1px solid rgba(0, 255, 0, 0.5); background-color: transparent; opacity: 1;\n\
         }}\n\
         #checkbox-master-group input[type=\"checkbox\"]:checked {{\n\
         \x20   background-color: rgba(255, 0, 0, 0.5);\n\
         \x20   border: 1px solid rgba(255, 0, 0, 1);\n\
         }}\n\
         /* Individual box positions, relative to the master group. */\n",
        width = width,
        height = height,
        bg = bg_filename,
        min_x = min_x,
        min_y = min_y,
        size = BOX_SIZE_PX
    );
    for (i, b) in boxes.iter().enumerate() {
        let _ = writeln!(
            css,
            "#box{} {{ top: {}px; left: {}px; }}",
            i + 1,
            b.top() - min_y,
            b.left() - min_x
        );
    }
    css
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_boxes() -> Vec<Rect> {
        vec![Rect::ltwh(5, 5, 10, 10), Rect::ltwh(20, 5, 10, 10)]
    }

    #[test]
    fn group_origin_is_min_over_both_axes() {
        assert_eq!(group_origin(&sample_boxes()), (5, 5));
        assert_eq!(group_origin(&[]), (0, 0));
    }

    #[test]
    fn markers_are_positioned_relative_to_the_group() {
        let css = stylesheet("ship.png", 640, 480, &sample_boxes());
        assert!(css.contains("top: 5px; left: 5px;"));
        assert!(css.contains("#box1 { top: 0px; left: 0px; }"));
        assert!(css.contains("#box2 { top: 0px; left: 15px; }"));
    }

    #[test]
    fn container_matches_image_dimensions_and_background() {
        let css = stylesheet("ship.png", 640, 480, &sample_boxes());
        assert!(css.contains("width: 640px; height: 480px;"));
        assert!(css.contains("background-image: url('../images/ship.png');"));
        assert!(css.contains(&format!("width: {size}px; height: {size}px;", size = BOX_SIZE_PX)));
    }

    #[test]
    fn markup_carries_ids_and_absolute_positions() {
        let html = html_document("ship", "ship.css", &sample_boxes());
        assert!(html.contains("<title>ship</title>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"css/ship.css\">"));
        assert!(html.contains("id=\"box1\" title=\"box1: x=5px, y=5px\""));
        assert!(html.contains("id=\"box2\" title=\"box2: x=20px, y=5px\""));
    }
}
